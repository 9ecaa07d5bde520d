//! Translation operations: the translate/analyze mutations and the cached
//! pattern query.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::api::RemoteApi;
use crate::error::{CoreError, ValidationError};
use crate::notify::NotificationCenter;
use crate::query::{QueryClient, QueryKey};
use crate::translation::{
    CodeAnalysis, CodeAnalysisRequest, TranslationOutcome, TranslationPattern, TranslationRequest,
    TranslationResponse, TranslationStore,
};
use crate::validation::validate_code;

const STALE_PATTERNS: Duration = Duration::from_secs(30 * 60);

fn patterns_key(source: Option<&str>, target: Option<&str>) -> QueryKey {
    QueryKey::new(["translation", "patterns"])
        .push_opt(source.map(|s| format!("source={s}")))
        .push_opt(target.map(|t| format!("target={t}")))
}

pub struct TranslationOps {
    api: Arc<dyn RemoteApi>,
    store: Arc<TranslationStore>,
    queries: Arc<QueryClient>,
    notify: Arc<NotificationCenter>,
}

impl TranslationOps {
    pub fn new(
        api: Arc<dyn RemoteApi>,
        store: Arc<TranslationStore>,
        queries: Arc<QueryClient>,
        notify: Arc<NotificationCenter>,
    ) -> Self {
        Self {
            api,
            store,
            queries,
            notify,
        }
    }

    fn check_code(&self, code: &str) -> Result<(), CoreError> {
        if let Err(err) = validate_code(code) {
            self.notify.warning("Check your code", err.to_string());
            return Err(err.into());
        }
        Ok(())
    }

    /// Translate the submitted code. Validation failures never reach the
    /// remote boundary. The in-flight flag flips optimistically; on success
    /// the workbench gets the result and the history a new entry, on error
    /// the flag rolls back.
    pub async fn translate(
        &self,
        request: TranslationRequest,
    ) -> Result<TranslationResponse, CoreError> {
        self.check_code(&request.code)?;
        if request.source_framework.is_empty() || request.target_framework.is_empty() {
            let err = ValidationError::single("Select source and target frameworks");
            self.notify.warning("Frameworks not selected", err.to_string());
            return Err(err.into());
        }

        self.store.set_translating(true);
        match self.api.translate_code(request.clone()).await {
            Ok(response) => {
                self.store.set_result(TranslationOutcome {
                    target_code: response.target.code.clone(),
                    confidence: response.metadata.confidence,
                    warnings: response.metadata.warnings.clone(),
                    suggestions: response.metadata.suggestions.clone(),
                });
                self.store.push_history(
                    &request.source_framework,
                    &request.target_framework,
                    response.metadata.confidence,
                );
                info!(
                    source = %request.source_framework,
                    target = %request.target_framework,
                    confidence = response.metadata.confidence,
                    "translation completed"
                );
                Ok(response)
            }
            Err(err) => {
                self.store.set_translating(false);
                self.notify.error("Translation failed", err.to_string());
                Err(err.into())
            }
        }
    }

    /// Pre-translation feasibility check. Same validation gate as
    /// [`translate`](Self::translate); no store side effects.
    pub async fn analyze(&self, request: CodeAnalysisRequest) -> Result<CodeAnalysis, CoreError> {
        self.check_code(&request.code)?;
        match self.api.analyze_code(request).await {
            Ok(analysis) => Ok(analysis),
            Err(err) => {
                self.notify.error("Code analysis failed", err.to_string());
                Err(err.into())
            }
        }
    }

    /// Cached rewrite-pattern catalog for a framework pair.
    pub async fn patterns(
        &self,
        source: Option<&str>,
        target: Option<&str>,
    ) -> Result<Vec<TranslationPattern>, CoreError> {
        let api = self.api.clone();
        let source_owned = source.map(str::to_string);
        let target_owned = target.map(str::to_string);
        let patterns = self
            .queries
            .fetch(&patterns_key(source, target), STALE_PATTERNS, move || {
                let api = api.clone();
                let source = source_owned.clone();
                let target = target_owned.clone();
                async move {
                    api.translation_patterns(source.as_deref(), target.as_deref())
                        .await
                }
            })
            .await?;
        Ok(patterns)
    }
}
