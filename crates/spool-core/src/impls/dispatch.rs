//! CategoryDispatch - payload の category で Processor を選ぶ
//!
//! payload の形式は `<category>:<key>`（例: `anime:1535`）。
//! 登録されていない category は `ErrorKind::Rejected` になり、再投入されない。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{ProcessError, ProcessOutcome};
use crate::error::SpoolError;
use crate::ports::Processor;

pub const CATEGORY_SEPARATOR: char = ':';

/// Registry of processors (category -> processor).
///
/// Built during initialization, then only read. The key part of the payload
/// (after the first separator) is what the category processor sees.
#[derive(Default)]
pub struct CategoryDispatch {
    processors: HashMap<String, Arc<dyn Processor>>,
}

impl CategoryDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        category: impl Into<String>,
        processor: Arc<dyn Processor>,
    ) -> Result<(), SpoolError> {
        let category = category.into();
        if self.processors.contains_key(&category) {
            return Err(SpoolError::DuplicateProcessor(category));
        }
        self.processors.insert(category, processor);
        Ok(())
    }

    /// Registered categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.processors.keys().cloned().collect();
        categories.sort();
        categories
    }

    /// Split a payload into `(category, key)`.
    pub fn split(payload: &str) -> Option<(&str, &str)> {
        payload.split_once(CATEGORY_SEPARATOR)
    }
}

#[async_trait]
impl Processor for CategoryDispatch {
    async fn process(&self, payload: &str) -> Result<ProcessOutcome, ProcessError> {
        let (category, key) = Self::split(payload).ok_or_else(|| {
            ProcessError::rejected(format!(
                "malformed payload {payload:?}: expected <category>{CATEGORY_SEPARATOR}<key>"
            ))
        })?;

        let processor = self.processors.get(category).ok_or_else(|| {
            ProcessError::rejected(format!(
                "no processor for category {category:?} (registered: {})",
                self.categories().join(", ")
            ))
        })?;

        processor.process(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::ports::FnProcessor;

    fn echo_into(seen: Arc<std::sync::Mutex<Vec<String>>>) -> Arc<dyn Processor> {
        Arc::new(FnProcessor::new(move |key: &str| {
            seen.lock().unwrap().push(key.to_string());
            Ok(ProcessOutcome::Succeeded)
        }))
    }

    #[tokio::test]
    async fn routes_key_to_category_processor() {
        let anime = Arc::new(std::sync::Mutex::new(Vec::new()));
        let manga = Arc::new(std::sync::Mutex::new(Vec::new()));

        let mut dispatch = CategoryDispatch::new();
        dispatch.register("anime", echo_into(anime.clone())).unwrap();
        dispatch.register("manga", echo_into(manga.clone())).unwrap();

        dispatch.process("anime:1535").await.unwrap();
        dispatch.process("manga:2:extra").await.unwrap();

        assert_eq!(*anime.lock().unwrap(), vec!["1535"]);
        assert_eq!(*manga.lock().unwrap(), vec!["2:extra"]);
    }

    #[tokio::test]
    async fn unknown_or_malformed_payloads_are_rejected() {
        let mut dispatch = CategoryDispatch::new();
        dispatch
            .register("anime", Arc::new(FnProcessor::new(|_: &str| Ok(ProcessOutcome::Succeeded))))
            .unwrap();

        let err = dispatch.process("novel:9").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejected);
        assert_eq!(
            err.message(),
            "no processor for category \"novel\" (registered: anime)"
        );

        let err = dispatch.process("no-separator").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejected);
    }

    #[test]
    fn double_registration_is_an_error() {
        let mut dispatch = CategoryDispatch::new();
        let p: Arc<dyn Processor> =
            Arc::new(FnProcessor::new(|_: &str| Ok(ProcessOutcome::Succeeded)));
        dispatch.register("anime", p.clone()).unwrap();

        let result = dispatch.register("anime", p);
        assert!(matches!(result, Err(SpoolError::DuplicateProcessor(c)) if c == "anime"));
        assert_eq!(dispatch.categories(), vec!["anime".to_string()]);
    }

    #[test]
    fn split_stops_at_the_first_separator() {
        assert_eq!(CategoryDispatch::split("manga:42"), Some(("manga", "42")));
        assert_eq!(CategoryDispatch::split("manga:4:2"), Some(("manga", "4:2")));
        assert_eq!(CategoryDispatch::split("manga"), None);
    }
}
