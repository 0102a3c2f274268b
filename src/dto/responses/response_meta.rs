use serde_derive::Serialize;

#[derive(Serialize)]
pub struct ResponseMeta<M: serde::Serialize> {
    pub time_taken: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub metadata: M,
}

impl<M: serde::Serialize> ResponseMeta<M> {
    pub fn from(start: tokio::time::Instant, metadata: M) -> Self {
        ResponseMeta {
            time_taken: format!("{:?}", start.elapsed()),
            timestamp: chrono::Utc::now(),
            metadata,
        }
    }
}
