use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Uniform `{"message": ...}` payload used by every error response.
#[derive(Serialize, Deserialize, Debug)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self { message: message.into() }
    }
}
