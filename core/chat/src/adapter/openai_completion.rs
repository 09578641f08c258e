//! OpenAI 互換エンドポイントへのストリーミング補完アダプタ

use crate::ports::outbound::ChatCompletion;
use common::error::Error;
use common::llm::{ChatRequest, DeltaStream, LlmProvider, OpenAiCompatProvider};

/// 呼び出しごとに OpenAiCompatProvider を組み立てて送信する
pub struct OpenAiCompletion;

impl OpenAiCompletion {
    pub fn new() -> Self {
        Self
    }
}

impl ChatCompletion for OpenAiCompletion {
    fn open_stream(
        &self,
        endpoint_url: &str,
        api_key: &str,
        request: &ChatRequest,
    ) -> Result<Box<dyn DeltaStream>, Error> {
        if endpoint_url.trim().is_empty() {
            return Err(Error::stream("endpoint URL is not set"));
        }
        let provider = OpenAiCompatProvider::new(endpoint_url, Some(api_key));
        provider.open_stream(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::msg::Message;

    #[test]
    fn test_empty_endpoint_fails_before_network() {
        let req = ChatRequest::streaming("m", vec![Message::user("hi")]);
        let err = OpenAiCompletion::new()
            .open_stream("  ", "", &req)
            .err()
            .unwrap();
        assert!(matches!(err, Error::Stream(_)));
        assert!(err.message().contains("endpoint URL is not set"));
    }
}
