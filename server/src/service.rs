//! Word-embedding queries and model administration.

use crate::api::{
    ActivateModelResult, AvailableModel, AvailableModelsResult, FindSimilarRequest,
    FindSimilarResult, MeasureSimilarityRequest, MeasureSimilarityResult, SimilarWord, Term,
};
use crate::catalog::{ModelCatalog, ModelDescriptor};
use crate::error::{LingusError, LingusResult};
use crate::guard::ActiveModelGuard;
use lingus_embedding::EmbeddingModel;
use tokio::sync::Mutex;

/// Entry point for all word-embedding operations.
///
/// Owns the catalog and the active-model guard. Activations are serialised so
/// that the catalog's `active` flags always agree with the guard once an
/// activation has returned.
pub struct SimilarityService {
    catalog: ModelCatalog,
    guard: ActiveModelGuard,
    activation: Mutex<()>,
}

impl SimilarityService {
    pub fn new(catalog: ModelCatalog, guard: ActiveModelGuard) -> Self {
        Self {
            catalog,
            guard,
            activation: Mutex::new(()),
        }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Finds similar words for every requested term.
    ///
    /// Terms the model does not recognise come back with an empty suggestion
    /// list rather than an error. Suggestions are ordered most similar first
    /// and never include the term itself (compared case-insensitively). All
    /// terms of one request are answered by the same model.
    pub async fn find_similar(
        &self,
        request: &FindSimilarRequest,
    ) -> LingusResult<FindSimilarResult> {
        if request.terms().is_empty() {
            return Ok(FindSimilarResult { terms: Vec::new() });
        }

        let limit = request.suggestions_per_term();
        let requested: Vec<String> = request.terms().iter().cloned().collect();
        let terms = self
            .guard
            .query(move |model| {
                requested
                    .iter()
                    .map(|term| resolve_term(model, term, limit))
                    .collect::<Vec<_>>()
            })
            .await?;

        Ok(FindSimilarResult { terms })
    }

    /// Measures the similarity between two words.
    ///
    /// # Errors
    /// [`LingusError::UnknownTerm`] naming the first unrecognised word, `word1`
    /// being checked before `word2`.
    pub async fn measure_similarity(
        &self,
        request: &MeasureSimilarityRequest,
    ) -> LingusResult<MeasureSimilarityResult> {
        let request = request.clone();
        self.guard
            .query(move |model| {
                for word in [&request.word1, &request.word2] {
                    if !model.contains(word) {
                        return Err(LingusError::UnknownTerm(word.clone()));
                    }
                }
                let similarity = model.similarity(&request.word1, &request.word2);
                Ok(MeasureSimilarityResult {
                    word1: request.word1,
                    word2: request.word2,
                    similarity,
                })
            })
            .await?
    }

    /// All model files known to the catalog, with their activation status.
    pub fn available_models(&self) -> AvailableModelsResult {
        AvailableModelsResult {
            available_models: self
                .catalog
                .descriptors()
                .into_iter()
                .map(|m| AvailableModel {
                    filename: m.filename,
                    active: m.active,
                })
                .collect(),
        }
    }

    /// Activates the model stored in `filename`, deactivating the current one.
    ///
    /// Activating the model that is already active reloads it and reports it as
    /// both activated and deactivated.
    ///
    /// # Errors
    /// - [`LingusError::UnavailableModel`] if the catalog has no such file
    /// - [`LingusError::UnableToActivateModel`] if loading fails; the current
    ///   model then stays active
    pub async fn activate_model(&self, filename: &str) -> LingusResult<ActivateModelResult> {
        let descriptor = self
            .catalog
            .find(filename)
            .ok_or_else(|| LingusError::UnavailableModel(filename.to_string()))?;

        let _activation = self.activation.lock().await;
        let previous = self.guard.activate(descriptor.clone()).await?;

        if let Some(previous) = &previous {
            self.catalog.mark_inactive(&previous.filename);
        }
        self.catalog.mark_active(&descriptor.filename);

        Ok(ActivateModelResult {
            activated: descriptor.filename,
            deactivated: previous.map(|p| p.filename),
        })
    }

    /// Descriptor of the model currently serving queries.
    pub async fn current_model(&self) -> Option<ModelDescriptor> {
        self.guard.current_descriptor().await
    }
}

fn resolve_term(model: &dyn EmbeddingModel, term: &str, limit: usize) -> Term {
    if !model.contains(term) {
        tracing::warn!("The model does not recognize the term '{}'.", term);
        return Term::unresolved(term);
    }

    let folded = term.to_lowercase();
    let similar = model
        .nearest(term, limit)
        .into_iter()
        .filter(|candidate| candidate.to_lowercase() != folded)
        .map(|word| SimilarWord {
            similarity: model.similarity(term, &word),
            word,
        })
        .collect();

    Term {
        term: term.to_string(),
        similar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DEFAULT_SUGGESTIONS_PER_TERM;
    use crate::test_support::{ANIMALS, VEHICLES};
    use lingus_embedding::Word2VecLoader;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn service(files: &[(&str, &str)]) -> (TempDir, SimilarityService) {
        let dir = TempDir::new().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        let catalog = ModelCatalog::scan(dir.path()).unwrap();
        let guard = ActiveModelGuard::new(Arc::new(Word2VecLoader));
        (dir, SimilarityService::new(catalog, guard))
    }

    async fn animals_service() -> (TempDir, SimilarityService) {
        let (dir, service) = service(&[("animals.txt", ANIMALS), ("vehicles.txt", VEHICLES)]);
        service.activate_model("animals.txt").await.unwrap();
        (dir, service)
    }

    fn active_flags(service: &SimilarityService) -> Vec<(String, bool)> {
        service
            .available_models()
            .available_models
            .into_iter()
            .map(|m| (m.filename, m.active))
            .collect()
    }

    #[tokio::test]
    async fn test_find_similar_unknown_term_is_empty() {
        let (_dir, service) = animals_service().await;
        let request = FindSimilarRequest::builder().for_term("unknownword").limit(5).build();

        let result = service.find_similar(&request).await.unwrap();
        assert_eq!(result.terms, vec![Term::unresolved("unknownword")]);
    }

    #[tokio::test]
    async fn test_find_similar_ranks_and_filters_term() {
        let (_dir, service) = animals_service().await;
        let request = FindSimilarRequest::builder().for_term("cat").limit(3).build();

        let result = service.find_similar(&request).await.unwrap();
        assert_eq!(result.terms.len(), 1);
        let words: Vec<&str> = result.terms[0].similar.iter().map(|s| s.word.as_str()).collect();
        // "Cat" is among the three nearest but is the query term in another case
        assert_eq!(words, vec!["kitten", "dog"]);
        assert!(result.terms[0].similar[0].similarity > result.terms[0].similar[1].similarity);
    }

    #[tokio::test]
    async fn test_find_similar_scores_match_model() {
        let (dir, service) = animals_service().await;
        let model = lingus_embedding::Word2VecModel::from_path(&dir.path().join("animals.txt")).unwrap();
        let request = FindSimilarRequest::builder().for_term("car").limit(2).build();

        let result = service.find_similar(&request).await.unwrap();
        for similar in &result.terms[0].similar {
            assert_eq!(similar.similarity, model.similarity("car", &similar.word));
        }
    }

    #[tokio::test]
    async fn test_find_similar_multiple_terms() {
        let (_dir, service) = animals_service().await;
        let request = FindSimilarRequest::builder()
            .for_terms(["dog", "unknownword", "truck"])
            .build();

        let result = service.find_similar(&request).await.unwrap();
        assert_eq!(result.terms.len(), 3);
        for term in &result.terms {
            match term.term.as_str() {
                "unknownword" => assert!(term.similar.is_empty()),
                _ => assert!(!term.similar.is_empty()),
            }
            assert!(term.similar.len() <= DEFAULT_SUGGESTIONS_PER_TERM);
        }
    }

    #[tokio::test]
    async fn test_find_similar_without_model() {
        let (_dir, service) = service(&[("animals.txt", ANIMALS)]);
        let request = FindSimilarRequest::builder().for_term("cat").build();
        assert!(matches!(
            service.find_similar(&request).await,
            Err(LingusError::NoModelLoaded)
        ));
    }

    #[tokio::test]
    async fn test_measure_similarity() {
        let (dir, service) = animals_service().await;
        let model = lingus_embedding::Word2VecModel::from_path(&dir.path().join("animals.txt")).unwrap();

        let result = service
            .measure_similarity(&MeasureSimilarityRequest::new("cat", "dog"))
            .await
            .unwrap();
        assert_eq!(result.word1, "cat");
        assert_eq!(result.word2, "dog");
        assert_eq!(result.similarity, model.similarity("cat", "dog"));
    }

    #[tokio::test]
    async fn test_measure_similarity_unknown_term() {
        let (_dir, service) = animals_service().await;

        match service
            .measure_similarity(&MeasureSimilarityRequest::new("cat", "unknownword"))
            .await
        {
            Err(LingusError::UnknownTerm(term)) => assert_eq!(term, "unknownword"),
            other => panic!("Expected UnknownTerm, got {:?}", other),
        }

        // word1 is reported first when both are unknown
        match service
            .measure_similarity(&MeasureSimilarityRequest::new("foo", "bar"))
            .await
        {
            Err(LingusError::UnknownTerm(term)) => assert_eq!(term, "foo"),
            other => panic!("Expected UnknownTerm, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_measure_similarity_without_model() {
        let (_dir, service) = service(&[("animals.txt", ANIMALS)]);
        assert!(matches!(
            service
                .measure_similarity(&MeasureSimilarityRequest::new("cat", "dog"))
                .await,
            Err(LingusError::NoModelLoaded)
        ));
    }

    #[tokio::test]
    async fn test_activate_model_updates_catalog() {
        let (_dir, service) = service(&[("animals.txt", ANIMALS), ("vehicles.txt", VEHICLES)]);

        let first = service.activate_model("animals.txt").await.unwrap();
        assert_eq!(first.activated, "animals.txt");
        assert_eq!(first.deactivated, None);
        assert_eq!(
            active_flags(&service),
            vec![("animals.txt".to_string(), true), ("vehicles.txt".to_string(), false)]
        );

        let second = service.activate_model("vehicles.txt").await.unwrap();
        assert_eq!(second.activated, "vehicles.txt");
        assert_eq!(second.deactivated.as_deref(), Some("animals.txt"));
        assert_eq!(
            active_flags(&service),
            vec![("animals.txt".to_string(), false), ("vehicles.txt".to_string(), true)]
        );
        assert_eq!(service.current_model().await.unwrap().filename, "vehicles.txt");
    }

    #[tokio::test]
    async fn test_activate_unavailable_model() {
        let (_dir, service) = animals_service().await;
        let before = active_flags(&service);

        match service.activate_model("missing.bin").await {
            Err(LingusError::UnavailableModel(name)) => assert_eq!(name, "missing.bin"),
            other => panic!("Expected UnavailableModel, got {:?}", other),
        }
        assert_eq!(active_flags(&service), before);
        assert_eq!(service.current_model().await.unwrap().filename, "animals.txt");
    }

    #[tokio::test]
    async fn test_failed_activation_keeps_active_model() {
        let (_dir, service) = service(&[("animals.txt", ANIMALS), ("broken.txt", "2 3\ncat 1 0 0\n")]);
        service.activate_model("animals.txt").await.unwrap();

        assert!(matches!(
            service.activate_model("broken.txt").await,
            Err(LingusError::UnableToActivateModel { .. })
        ));
        assert_eq!(service.catalog().active().unwrap().filename, "animals.txt");
        let result = service
            .measure_similarity(&MeasureSimilarityRequest::new("cat", "dog"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_reactivating_active_model() {
        let (_dir, service) = animals_service().await;

        let result = service.activate_model("animals.txt").await.unwrap();
        assert_eq!(result.activated, "animals.txt");
        assert_eq!(result.deactivated.as_deref(), Some("animals.txt"));
        assert_eq!(service.catalog().active().unwrap().filename, "animals.txt");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_activations_keep_single_active_flag() {
        let (_dir, service) = service(&[("animals.txt", ANIMALS), ("vehicles.txt", VEHICLES)]);
        let service = Arc::new(service);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = Arc::clone(&service);
                let name = if i % 2 == 0 { "animals.txt" } else { "vehicles.txt" };
                tokio::spawn(async move { service.activate_model(name).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let active: Vec<_> = service
            .catalog()
            .descriptors()
            .into_iter()
            .filter(|m| m.active)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(
            Some(active[0].filename.clone()),
            service.current_model().await.map(|m| m.filename)
        );
    }
}
