//! Full-fidelity JSON backend.

use std::io::{Read, Write};

use serde_json::Value as Json;

use super::{Driver, DriverError, write_json};
use crate::{AutoMap, Result, codec::TypeCodec};

/// JSON driver that routes every value through its [`TypeCodec`].
///
/// Dumping builds an intermediate `serde_json::Value` with
/// [`TypeCodec::encode_map`]; loading parses into one and hands it to
/// [`TypeCodec::decode_document`], so implicit strings are upgraded and
/// explicit wrappers are unwrapped.
///
/// ```
/// # use automap::{AutoMap, Driver, JsonDriver};
/// # use uuid::Uuid;
/// let driver = JsonDriver::default();
///
/// let mut doc = AutoMap::new();
/// doc["user"]["id"] = Uuid::nil().into();
///
/// let text = driver.dumps(&doc, None)?;
/// assert_eq!(text, r#"{"user":{"id":"00000000-0000-0000-0000-000000000000"}}"#);
/// assert_eq!(driver.loads(&text)?, doc);
/// # Ok::<(), automap::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonDriver {
    codec: TypeCodec,
}

impl JsonDriver {
    /// Creates a driver using `codec`.
    pub fn new(codec: TypeCodec) -> Self {
        Self { codec }
    }

    fn decode(&self, wire: Json) -> Result<AutoMap> {
        self.codec.decode_document(wire)
    }
}

impl Driver for JsonDriver {
    fn name(&self) -> &'static str {
        "json"
    }

    fn codec(&self) -> &TypeCodec {
        &self.codec
    }

    fn dump_writer(
        &self,
        tree: &AutoMap,
        writer: &mut dyn Write,
        indent: Option<usize>,
    ) -> Result<()> {
        let wire = self.codec.encode_map(tree)?;
        write_json(writer, &wire, indent).map_err(DriverError::from_write)?;
        Ok(())
    }

    fn load_reader(&self, reader: &mut dyn Read) -> Result<AutoMap> {
        let wire: Json = serde_json::from_reader(reader).map_err(DriverError::from_read)?;
        self.decode(wire)
    }

    fn load_slice(&self, bytes: &[u8]) -> Result<AutoMap> {
        let wire: Json = serde_json::from_slice(bytes).map_err(DriverError::from_read)?;
        self.decode(wire)
    }
}
