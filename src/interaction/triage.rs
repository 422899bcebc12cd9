//! The triage orchestrator: extraction, classification, persistence.

use tracing::{info, instrument, warn};

use crate::{
    base::{
        error::TriageError,
        types::{Severity, TriageResult},
    },
    service::{
        classifier::ClassifierClient,
        db::{StoreClient, TriageRecord},
        llm::ExtractorClient,
    },
};

/// Policy bound on extracted symptoms, applied regardless of what the
/// extractor returns.
pub const MAX_SYMPTOMS: usize = 5;

/// Note appended to the guidance message when the store call fails.
pub const PERSISTENCE_FAILURE_NOTE: &str = "\n(Note: Could not save details to database.)";

/// Run one message through the triage pipeline.
///
/// `raw_message` is never empty; the normalizer guarantees that upstream.
///
/// Failure policy per stage:
/// - extraction failure is fatal for the whole request;
/// - classification failure is fatal (see DESIGN.md for the policy choice);
/// - persistence failure is fully isolated: the record id stays unset and a
///   note is appended to the guidance message, nothing else changes.
#[instrument(skip_all)]
pub async fn process(raw_message: &str, extractor: &ExtractorClient, classifier: &ClassifierClient, store: &StoreClient) -> Result<TriageResult, TriageError> {
    // Stage 1: extraction.

    let mut symptoms = extractor.extract_symptoms(raw_message).await.map_err(TriageError::Extraction)?;
    symptoms.truncate(MAX_SYMPTOMS);

    info!("Extracted {} symptoms.", symptoms.len());

    // Stage 2: classification, skipped when nothing was extracted.

    let (severity, confidence) = if symptoms.is_empty() {
        (Severity::NoSymptomsFound, 0.0)
    } else {
        let prediction = classifier.classify_severity(&symptoms.join(", ")).await.map_err(TriageError::Classification)?;

        match Severity::parse_label(&prediction.severity) {
            Some(severity) => (severity, prediction.confidence),
            None => {
                warn!("Severity model returned unknown label `{}`.", prediction.severity);
                (Severity::UnknownSeverity, prediction.confidence)
            }
        }
    };

    let mut message = severity.guidance().to_string();

    // Stage 3: persistence. A store failure must never fail the request.

    let record = TriageRecord::queued(raw_message, &symptoms, severity, confidence);
    let record_id = match store.append_triage(&record).await {
        Ok(id) => Some(id),
        Err(err) => {
            warn!("Could not persist triage record: {err}");
            message.push_str(PERSISTENCE_FAILURE_NOTE);
            None
        }
    };

    Ok(TriageResult {
        raw_message: raw_message.to_string(),
        symptoms,
        severity,
        confidence,
        record_id,
        message,
    })
}

// Tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use mockall::mock;

    use crate::{
        base::types::Res,
        service::{
            classifier::{GenericClassifierClient, SeverityPrediction},
            db::GenericTriageStore,
            llm::GenericExtractorClient,
        },
    };

    use super::*;

    mock! {
        pub Extractor {}

        #[async_trait]
        impl GenericExtractorClient for Extractor {
            async fn extract_symptoms(&self, text: &str) -> Res<Vec<String>>;
        }
    }

    mock! {
        pub Classifier {}

        #[async_trait]
        impl GenericClassifierClient for Classifier {
            async fn classify_severity(&self, symptoms: &str) -> Res<SeverityPrediction>;
        }
    }

    mock! {
        pub Store {}

        #[async_trait]
        impl GenericTriageStore for Store {
            async fn append_triage(&self, record: &TriageRecord) -> Res<String>;
        }
    }

    fn extractor_returning(symptoms: Vec<&'static str>) -> ExtractorClient {
        let mut mock = MockExtractor::new();
        mock.expect_extract_symptoms().returning(move |_| Ok(symptoms.iter().map(|s| s.to_string()).collect()));
        ExtractorClient::new(Arc::new(mock))
    }

    fn classifier_returning(severity: &'static str, confidence: f64) -> ClassifierClient {
        let mut mock = MockClassifier::new();
        mock.expect_classify_severity().returning(move |_| {
            Ok(SeverityPrediction {
                severity: severity.to_string(),
                confidence,
            })
        });
        ClassifierClient::new(Arc::new(mock))
    }

    fn store_returning(id: &'static str) -> StoreClient {
        let mut mock = MockStore::new();
        mock.expect_append_triage().returning(move |_| Ok(id.to_string()));
        StoreClient::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn classifies_and_persists_a_moderate_case() {
        let extractor = extractor_returning(vec!["headache", "fever"]);
        let classifier = classifier_returning("moderate", 0.81);
        let store = store_returning("abc123");

        let result = process("I have a headache and fever", &extractor, &classifier, &store).await.unwrap();

        assert_eq!(result.raw_message, "I have a headache and fever");
        assert_eq!(result.symptoms, vec!["headache", "fever"]);
        assert_eq!(result.severity, Severity::Moderate);
        assert_eq!(result.confidence, 0.81);
        assert_eq!(result.record_id.as_deref(), Some("abc123"));
        assert_eq!(result.message, Severity::Moderate.guidance());
    }

    #[tokio::test]
    async fn empty_extraction_skips_the_classifier() {
        let extractor = extractor_returning(vec![]);

        // The classifier must never be called.
        let mut classifier_mock = MockClassifier::new();
        classifier_mock.expect_classify_severity().times(0);
        let classifier = ClassifierClient::new(Arc::new(classifier_mock));

        let store = store_returning("abc123");

        let result = process("asdfgh", &extractor, &classifier, &store).await.unwrap();

        assert_eq!(result.severity, Severity::NoSymptomsFound);
        assert_eq!(result.confidence, 0.0);
        assert!(result.symptoms.is_empty());
        assert_eq!(result.message, Severity::NoSymptomsFound.guidance());
    }

    #[tokio::test]
    async fn unknown_label_is_overridden() {
        let extractor = extractor_returning(vec!["dizziness"]);
        let classifier = classifier_returning("catastrophic", 0.99);
        let store = store_returning("abc123");

        let result = process("I feel dizzy", &extractor, &classifier, &store).await.unwrap();

        assert_eq!(result.severity, Severity::UnknownSeverity);
        assert_eq!(result.confidence, 0.99);
        assert_eq!(result.message, Severity::UnknownSeverity.guidance());
    }

    #[tokio::test]
    async fn symptoms_are_truncated_to_the_policy_bound() {
        let extractor = extractor_returning(vec!["a", "b", "c", "d", "e", "f", "g"]);

        // The classifier sees only the truncated join.
        let mut classifier_mock = MockClassifier::new();
        classifier_mock.expect_classify_severity().withf(|symptoms| symptoms == "a, b, c, d, e").returning(|_| {
            Ok(SeverityPrediction {
                severity: "routine".to_string(),
                confidence: 0.5,
            })
        });
        let classifier = ClassifierClient::new(Arc::new(classifier_mock));

        let store = store_returning("abc123");

        let result = process("many symptoms", &extractor, &classifier, &store).await.unwrap();

        assert_eq!(result.symptoms.len(), MAX_SYMPTOMS);
    }

    #[tokio::test]
    async fn persistence_failure_is_isolated() {
        let extractor = extractor_returning(vec!["cough"]);
        let classifier = classifier_returning("routine", 0.6);

        let mut store_mock = MockStore::new();
        store_mock.expect_append_triage().returning(|_| Err(anyhow::anyhow!("store is down")));
        let store = StoreClient::new(Arc::new(store_mock));

        let result = process("I have a cough", &extractor, &classifier, &store).await.unwrap();

        assert_eq!(result.record_id, None);
        assert_eq!(result.severity, Severity::Routine);
        assert_eq!(result.message, format!("{}{}", Severity::Routine.guidance(), PERSISTENCE_FAILURE_NOTE));
        assert_eq!(result.message.matches("Could not save details").count(), 1);
    }

    #[tokio::test]
    async fn extraction_failure_is_fatal_and_short_circuits() {
        let mut extractor_mock = MockExtractor::new();
        extractor_mock.expect_extract_symptoms().returning(|_| Err(anyhow::anyhow!("model unavailable")));
        let extractor = ExtractorClient::new(Arc::new(extractor_mock));

        let mut classifier_mock = MockClassifier::new();
        classifier_mock.expect_classify_severity().times(0);
        let classifier = ClassifierClient::new(Arc::new(classifier_mock));

        let mut store_mock = MockStore::new();
        store_mock.expect_append_triage().times(0);
        let store = StoreClient::new(Arc::new(store_mock));

        let err = process("I have a headache", &extractor, &classifier, &store).await.unwrap_err();

        assert!(matches!(err, TriageError::Extraction(_)));
    }

    #[tokio::test]
    async fn classification_failure_is_fatal() {
        let extractor = extractor_returning(vec!["chest pain"]);

        let mut classifier_mock = MockClassifier::new();
        classifier_mock.expect_classify_severity().returning(|_| Err(anyhow::anyhow!("endpoint 503")));
        let classifier = ClassifierClient::new(Arc::new(classifier_mock));

        let mut store_mock = MockStore::new();
        store_mock.expect_append_triage().times(0);
        let store = StoreClient::new(Arc::new(store_mock));

        let err = process("chest pain", &extractor, &classifier, &store).await.unwrap_err();

        assert!(matches!(err, TriageError::Classification(_)));
    }
}
