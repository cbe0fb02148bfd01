use crate::model::FrameId;
use crate::tables::FrameScoped;
use serde::{Deserialize, Serialize};
use table_actor::{TableError, TableRow};

/// One row of `lens_compatibility`. The serial `id` is assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensRow {
    pub id: Option<u32>,
    pub frame_id: FrameId,
    pub lens_type: Option<String>,
}

impl LensRow {
    pub fn new(frame_id: FrameId, lens_type: impl Into<String>) -> Self {
        Self {
            id: None,
            frame_id,
            lens_type: Some(lens_type.into()),
        }
    }
}

impl TableRow for LensRow {
    const TABLE: &'static str = "lens_compatibility";
    type Key = u32;
    type Context = ();

    fn key(&self) -> Option<u32> {
        self.id
    }

    fn assign_key(&mut self, seq: u32) -> Result<u32, TableError> {
        self.id = Some(seq);
        Ok(seq)
    }

    fn key_seq(key: &u32) -> Option<u32> {
        Some(*key)
    }
}

impl FrameScoped for LensRow {
    fn frame_id(&self) -> FrameId {
        self.frame_id
    }
}
