use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::services::{
    error::{ItemServiceError, ItemServiceResult},
    validation::{ValidationErrors, ValidatorRegistry},
};

/// Business logic for one request type
#[async_trait]
pub trait RequestHandler<R>: Send + Sync
where
    R: Send + Sync + 'static,
{
    type Response: Send;

    async fn handle(&self, request: R, cancel: &CancellationToken)
        -> ItemServiceResult<Self::Response>;
}

/// Validate-then-handle stage every operation goes through.
///
/// All validators registered for the request type run concurrently and
/// their failures are merged; any failure stops the request before its
/// handler sees it. Request types with no validators go straight to the
/// handler.
#[derive(Clone)]
pub struct Pipeline {
    registry: Arc<ValidatorRegistry>,
}

impl Pipeline {
    pub fn new(registry: Arc<ValidatorRegistry>) -> Self {
        Self { registry }
    }

    /// Run every validator for `R` and merge the results
    pub async fn validate<R>(&self, request: &R) -> Result<(), ValidationErrors>
    where
        R: Send + Sync + 'static,
    {
        let validators = self.registry.validators_for::<R>();
        if validators.is_empty() {
            return Ok(());
        }

        let results = join_all(validators.iter().map(|v| v.validate(request))).await;
        let errors = ValidationErrors::from_failures(results.into_iter().flatten());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate `request`, then pass it to `handler`. The handler's result or
    /// error is returned unchanged.
    pub async fn send<R, H>(
        &self,
        handler: &H,
        request: R,
        cancel: &CancellationToken,
    ) -> ItemServiceResult<H::Response>
    where
        R: Send + Sync + 'static,
        H: RequestHandler<R> + ?Sized,
    {
        if cancel.is_cancelled() {
            return Err(ItemServiceError::Cancelled);
        }

        if let Err(errors) = self.validate(&request).await {
            warn!(
                request = std::any::type_name::<R>(),
                fields = errors.field_count(),
                "Request rejected by validation"
            );
            return Err(ItemServiceError::ValidationFailed(errors));
        }

        debug!(request = std::any::type_name::<R>(), "Request passed validation");
        handler.handle(request, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validation::{FieldFailure, RuleSet, Validator};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Greeting {
        name: String,
    }

    struct Unchecked;

    struct CountingHandler {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RequestHandler<Greeting> for CountingHandler {
        type Response = String;

        async fn handle(
            &self,
            request: Greeting,
            _cancel: &CancellationToken,
        ) -> ItemServiceResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("hello {}", request.name))
        }
    }

    #[async_trait]
    impl RequestHandler<Unchecked> for CountingHandler {
        type Response = ();

        async fn handle(&self, _request: Unchecked, _cancel: &CancellationToken) -> ItemServiceResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    // Yields before answering so that validators genuinely interleave
    struct SlowValidator;

    #[async_trait]
    impl Validator<Greeting> for SlowValidator {
        async fn validate(&self, input: &Greeting) -> Vec<FieldFailure> {
            tokio::task::yield_now().await;
            if input.name.len() > 3 {
                vec![FieldFailure::new("name", "name is too long")]
            } else {
                Vec::new()
            }
        }
    }

    fn pipeline() -> Pipeline {
        let registry = ValidatorRegistry::new()
            .with::<Greeting, _>(SlowValidator)
            .with::<Greeting, _>(
                RuleSet::<Greeting>::new()
                    .rule("name", "name is required", |g: &Greeting| !g.name.is_empty())
                    .rule("name", "name must be lowercase", |g: &Greeting| {
                        g.name.chars().all(|c| !c.is_uppercase())
                    }),
            );
        Pipeline::new(Arc::new(registry))
    }

    fn handler() -> CountingHandler {
        CountingHandler {
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn test_valid_request_reaches_handler() {
        let handler = handler();
        let result = pipeline()
            .send(&handler, Greeting { name: "bob".into() }, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result, "hello bob");
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_from_all_validators_are_merged() {
        let handler = handler();
        let err = pipeline()
            .send(&handler, Greeting { name: "ALICE".into() }, &CancellationToken::new())
            .await
            .unwrap_err();

        let errors = err.validation_errors().unwrap();
        assert_eq!(
            errors.get("name"),
            Some(&["name is too long".to_string(), "name must be lowercase".to_string()][..])
        );
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_request_without_validators_goes_straight_through() {
        let handler = handler();
        pipeline()
            .send(&handler, Unchecked, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_request_is_not_handled() {
        let handler = handler();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = pipeline()
            .send(&handler, Greeting { name: "bob".into() }, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ItemServiceError::Cancelled));
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }
}
