//! Helper functions for driver testing

use std::sync::Arc;

use automap::{Driver, JsonDriver, MapTagging, StreamingJsonDriver, TypeCodec};

/// Codec used by the driver tests, with the `point` typed value registered.
pub fn test_codec(tagging: MapTagging) -> TypeCodec {
    let mut codec = TypeCodec::default().with_map_tagging(tagging);
    codec.register_typed("point");
    codec
}

/// Every backend, configured with the same codec.
pub fn all_drivers(tagging: MapTagging) -> Vec<Arc<dyn Driver>> {
    vec![
        Arc::new(JsonDriver::new(test_codec(tagging))),
        Arc::new(StreamingJsonDriver::new(test_codec(tagging))),
    ]
}

/// Every tagging mode.
pub fn taggings() -> [MapTagging; 2] {
    [MapTagging::Untagged, MapTagging::Tagged]
}
