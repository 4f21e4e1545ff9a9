use serde::{Deserialize, Serialize};

/// Who receives a random distribution: the literal string `"all"` or an
/// explicit email list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReceiverSet {
    Emails(Vec<String>),
    Keyword(String),
}

#[derive(Debug, Deserialize)]
pub struct DistributeRequest {
    pub receivers: ReceiverSet,
    /// Copies drawn per receiver.
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct SelfDistributeRequest {
    pub email: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct DistributeResponse {
    pub receivers: usize,
    pub quantity_per_receiver: i32,
    pub total_granted: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receiver_set_parses_keyword_and_list() {
        let req: DistributeRequest =
            serde_json::from_str(r#"{"receivers": "all", "quantity": 3}"#).unwrap();
        assert!(matches!(req.receivers, ReceiverSet::Keyword(ref k) if k == "all"));

        let req: DistributeRequest =
            serde_json::from_str(r#"{"receivers": ["a@x.com", "b@x.com"], "quantity": 1}"#)
                .unwrap();
        assert!(matches!(req.receivers, ReceiverSet::Emails(ref v) if v.len() == 2));
    }
}
