//! Redis Streams implementation of the `TaskPublisher` trait.
//!
//! Each task becomes one stream entry on the topic's stream:
//!
//! ```text
//! XADD <topic> [MAXLEN ~ <n>] * message_id <uuid> payload <bytes> metadata <json>
//! ```
//!
//! Consumers read with consumer groups, which gives at-least-once delivery.

use std::fmt;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::{debug, error, info};

use reportgen_core::error::ReportError;
use reportgen_core::task::{TaskMessage, TaskPublisher};

/// Stream entry field holding the message identity.
pub const MESSAGE_ID_FIELD: &str = "message_id";
/// Stream entry field holding the raw payload.
pub const PAYLOAD_FIELD: &str = "payload";
/// Stream entry field holding the metadata as a JSON object.
pub const METADATA_FIELD: &str = "metadata";

/// Publishes task messages to Redis Streams, one stream per topic.
#[derive(Clone)]
pub struct RedisStreamPublisher {
    connection: ConnectionManager,
    max_len: Option<usize>,
}

impl RedisStreamPublisher {
    /// Connects to the bus and verifies the connection with `PING`.
    ///
    /// `max_len` caps each stream approximately (`MAXLEN ~`); `None` leaves
    /// streams unbounded.
    ///
    /// # Errors
    ///
    /// Returns the Redis error if the URL is invalid or the server cannot
    /// be reached.
    pub async fn connect(url: &str, max_len: Option<usize>) -> redis::RedisResult<Self> {
        let client = redis::Client::open(url).inspect_err(|e| {
            error!(error = %e, "failed to create task bus client");
        })?;

        let connection = ConnectionManager::new(client).await.inspect_err(|e| {
            error!(error = %e, "failed to connect to task bus");
        })?;

        let mut conn = connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .inspect_err(|e| {
                error!(error = %e, "task bus did not answer PING");
            })?;

        info!(?max_len, "connected to task bus");
        Ok(Self {
            connection,
            max_len,
        })
    }
}

impl fmt::Debug for RedisStreamPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStreamPublisher")
            .field("max_len", &self.max_len)
            .finish_non_exhaustive()
    }
}

/// Flattens a message into stream entry field/value pairs.
///
/// # Errors
///
/// Returns `ReportError::Publish` if the metadata cannot be encoded.
pub fn stream_fields(message: &TaskMessage) -> Result<Vec<(&'static str, Vec<u8>)>, ReportError> {
    let metadata = serde_json::to_vec(&message.metadata)
        .map_err(|e| ReportError::Publish(format!("metadata encoding failed: {e}")))?;

    Ok(vec![
        (MESSAGE_ID_FIELD, message.message_id.to_string().into_bytes()),
        (PAYLOAD_FIELD, message.payload.clone()),
        (METADATA_FIELD, metadata),
    ])
}

fn xadd_command(
    topic: &str,
    max_len: Option<usize>,
    fields: Vec<(&'static str, Vec<u8>)>,
) -> redis::Cmd {
    let mut cmd = redis::cmd("XADD");
    cmd.arg(topic);
    if let Some(max_len) = max_len {
        cmd.arg("MAXLEN").arg("~").arg(max_len);
    }
    cmd.arg("*");
    for (field, value) in fields {
        cmd.arg(field).arg(value);
    }
    cmd
}

#[async_trait]
impl TaskPublisher for RedisStreamPublisher {
    async fn publish(&self, topic: &str, message: &TaskMessage) -> Result<(), ReportError> {
        let fields = stream_fields(message)?;
        let mut conn = self.connection.clone();

        let entry_id: String = xadd_command(topic, self.max_len, fields)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                error!(topic, message_id = %message.message_id, error = %e, "failed to publish task");
                ReportError::Publish(e.to_string())
            })?;

        debug!(topic, message_id = %message.message_id, entry_id = %entry_id, "task published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use reportgen_core::task::{NAMESPACE_METADATA_KEY, REPORT_GENERATOR_TOPIC};
    use uuid::Uuid;

    use super::*;

    fn sample_message() -> TaskMessage {
        TaskMessage::new(Uuid::from_u128(7), br#"{"report_id":"r-1"}"#.to_vec())
            .with_metadata(NAMESPACE_METADATA_KEY, "acme")
    }

    fn packed(cmd: &redis::Cmd) -> String {
        String::from_utf8_lossy(&cmd.get_packed_command()).into_owned()
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let result = RedisStreamPublisher::connect("not a redis url", None).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_stream_fields_carry_id_payload_and_metadata() {
        let fields = stream_fields(&sample_message()).unwrap();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].0, MESSAGE_ID_FIELD);
        assert_eq!(
            fields[0].1,
            b"00000000-0000-0000-0000-000000000007".to_vec()
        );
        assert_eq!(fields[1].0, PAYLOAD_FIELD);
        assert_eq!(fields[1].1, br#"{"report_id":"r-1"}"#.to_vec());
        assert_eq!(fields[2].0, METADATA_FIELD);
        let metadata: serde_json::Value = serde_json::from_slice(&fields[2].1).unwrap();
        assert_eq!(metadata["namespace"], "acme");
    }

    #[test]
    fn test_xadd_without_max_len_uses_auto_id() {
        let fields = stream_fields(&sample_message()).unwrap();
        let cmd = xadd_command(REPORT_GENERATOR_TOPIC, None, fields);

        let packed = packed(&cmd);
        assert!(packed.contains("XADD"));
        assert!(packed.contains(REPORT_GENERATOR_TOPIC));
        assert!(packed.contains("\r\n*\r\n"));
        assert!(!packed.contains("MAXLEN"));
    }

    #[test]
    fn test_xadd_with_max_len_trims_approximately() {
        let fields = stream_fields(&sample_message()).unwrap();
        let cmd = xadd_command(REPORT_GENERATOR_TOPIC, Some(10_000), fields);

        let packed = packed(&cmd);
        assert!(packed.contains("MAXLEN\r\n$1\r\n~\r\n$5\r\n10000"));
    }
}
