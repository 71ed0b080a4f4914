use crate::errors::Result;
use serde::{Deserialize, Serialize};

/// Per-user session settings
///
/// `connections` is the keypoint graph drawn over the camera feed, a list
/// of landmark index pairs. It is stored as a JSON array of pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub user_id: i64,
    pub dual_mode: bool,
    pub info_sound: bool,
    pub alert_sound: bool,
    pub mute: bool,
    pub connections: Vec<(u32, u32)>,
}

impl UserPreferences {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            dual_mode: false,
            info_sound: true,
            alert_sound: true,
            mute: false,
            connections: Vec::new(),
        }
    }

    pub fn connections_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.connections)?)
    }

    /// Parse the stored graph; an empty string is an empty graph
    pub fn parse_connections(json: &str) -> Result<Vec<(u32, u32)>> {
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Add an edge unless it is already present in either direction
    pub fn connect(&mut self, a: u32, b: u32) -> bool {
        let exists = self
            .connections
            .iter()
            .any(|&(x, y)| (x, y) == (a, b) || (x, y) == (b, a));
        if !exists {
            self.connections.push((a, b));
        }
        !exists
    }
}
