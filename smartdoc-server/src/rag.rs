//! Retrieval-augmented recommendation: vector search over the doctor
//! collection, then an LLM (or templated) explanation of the best match.

use std::sync::Arc;

use smartdoc_core::{
    ChatBackend, ChatMessage, EmbeddingBackend, ExplanationSource, PatientQueryResponse,
    Recommendation, SearchFilter, SearchMetadata, SearchResult, SmartDocError, VectorStore,
};

pub const NO_MATCHES_MESSAGE: &str = "No doctors found matching your criteria.";

const NO_CANDIDATES_EXPLANATION: &str =
    "No candidate doctors were found for this query, so no recommendation can be made.";

/// Results after the top one that are returned as alternatives.
const ALTERNATIVES: usize = 2;

const SYSTEM_PROMPT: &str = "You are a medical assistant helping to match patients with the most \
suitable doctors. Based on the patient's symptoms and the available doctor profiles, recommend \
the best doctor and explain why. Consider factors like specialty match, experience, location, \
and specific expertise. Always include a disclaimer that this is for informational purposes and \
patients should verify credentials.";

/// Search + explanation over shared service objects.
#[derive(Clone)]
pub struct RagService {
    embedder: Arc<dyn EmbeddingBackend>,
    store: Arc<dyn VectorStore>,
    llm: Option<Arc<dyn ChatBackend>>,
}

impl RagService {
    pub fn new(
        embedder: Arc<dyn EmbeddingBackend>,
        store: Arc<dyn VectorStore>,
        llm: Option<Arc<dyn ChatBackend>>,
    ) -> Self {
        Self {
            embedder,
            store,
            llm,
        }
    }

    pub fn llm_enabled(&self) -> bool {
        self.llm.is_some()
    }

    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Nearest doctors to `query`, best first.
    pub async fn search_doctors(
        &self,
        query: &str,
        filter: &SearchFilter,
        n_results: usize,
    ) -> Result<Vec<SearchResult>, SmartDocError> {
        tracing::debug!(stage = "embedding_query", query, "RAG request");
        let embedding = self.embedder.embed_query(query).await?;

        tracing::debug!(stage = "searching", ?filter, n_results, "RAG request");
        let hits = self.store.query(&embedding, filter, n_results).await?;

        Ok(hits.into_iter().map(SearchResult::from).collect())
    }

    /// Explain the top result. Never fails: LLM errors degrade to the template.
    pub async fn generate_recommendation(
        &self,
        query: &str,
        results: &[SearchResult],
    ) -> Recommendation {
        let Some(top) = results.first() else {
            return Recommendation {
                recommendation: None,
                explanation: NO_CANDIDATES_EXPLANATION.to_string(),
                alternative_options: Vec::new(),
                search_metadata: SearchMetadata {
                    total_results: 0,
                    query: query.to_string(),
                    model_used: None,
                    explanation_source: ExplanationSource::Template,
                },
            };
        };

        let (explanation, source, model_used) = match &self.llm {
            Some(llm) => {
                tracing::debug!(stage = "llm_call", model = llm.model(), "RAG request");
                let messages = [
                    ChatMessage::system(SYSTEM_PROMPT),
                    ChatMessage::user(user_prompt(query, results)),
                ];
                match llm.complete(&messages).await {
                    Ok(text) => (text, ExplanationSource::Llm, Some(llm.model().to_string())),
                    Err(e) => {
                        tracing::warn!(error = %e, "LLM call failed, using template");
                        (
                            format!("Error generating recommendation: {e}. {}", template(top)),
                            ExplanationSource::LlmError,
                            Some(llm.model().to_string()),
                        )
                    }
                }
            }
            None => {
                tracing::debug!(stage = "template_fallback", "RAG request");
                (template(top), ExplanationSource::Template, None)
            }
        };

        Recommendation {
            recommendation: Some(top.clone()),
            explanation,
            alternative_options: results.iter().skip(1).take(ALTERNATIVES).cloned().collect(),
            search_metadata: SearchMetadata {
                total_results: results.len(),
                query: query.to_string(),
                model_used,
                explanation_source: source,
            },
        }
    }

    pub async fn process_patient_query(
        &self,
        query: &str,
        location: Option<String>,
        specialty: Option<String>,
        n_results: usize,
    ) -> Result<PatientQueryResponse, SmartDocError> {
        tracing::debug!(stage = "received", query, "RAG request");
        let filter = SearchFilter::new(location, specialty);
        let results = self.search_doctors(query, &filter, n_results).await?;

        let response = if results.is_empty() {
            PatientQueryResponse::not_found(NO_MATCHES_MESSAGE)
        } else {
            PatientQueryResponse::found(self.generate_recommendation(query, &results).await)
        };

        tracing::debug!(
            stage = "responded",
            success = response.success,
            candidates = results.len(),
            "RAG request"
        );
        Ok(response)
    }
}

fn user_prompt(query: &str, results: &[SearchResult]) -> String {
    let profiles: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let d = &r.doctor;
            format!(
                "Doctor {}: {}\n- Specialty: {} ({})\n- Location: {}\n- Hospital: {}\n\
                 - Experience: {} years\n- Languages: {}\n- Expertise: {}\n- Special Interests: {}",
                i + 1,
                d.name,
                d.primary_specialty,
                d.sub_specialty,
                d.location,
                d.hospital_affiliation,
                d.years_of_experience,
                d.languages,
                d.surgeries_summary,
                d.expertise
            )
        })
        .collect();

    format!(
        "Patient Query: {query}\n\n\
         Available Doctors (ranked by relevance):\n{}\n\n\
         Please provide:\n\
         1. Your top recommendation with detailed reasoning\n\
         2. Why this doctor is the best match for the patient's needs\n\
         3. Any alternative options if applicable\n\
         4. Important considerations or next steps for the patient",
        profiles.join("\n\n")
    )
}

fn template(top: &SearchResult) -> String {
    let d = &top.doctor;
    format!(
        "Based on your query, the closest match is {}, a {} specialist ({}) at {} in {} with {} \
         years of experience. This is the top vector search result; please verify credentials \
         and availability before booking.",
        d.name,
        d.primary_specialty,
        d.sub_specialty,
        d.hospital_affiliation,
        d.location,
        d.years_of_experience
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use smartdoc_core::{HashingEmbeddingClient, InMemoryVectorStore, LlmError, VectorRecord};
    use smartdoc_ingest::generate_profiles;
    use std::sync::Mutex;

    struct ScriptedLlm {
        reply: Result<String, u16>,
        seen: Mutex<Vec<ChatMessage>>,
    }

    impl ScriptedLlm {
        fn new(reply: Result<&str, u16>) -> Self {
            Self {
                reply: reply.map(str::to_string),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedLlm {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
            self.seen.lock().unwrap().extend_from_slice(messages);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(code) => Err(LlmError::Api {
                    code: *code,
                    message: "rate limited".to_string(),
                }),
            }
        }

        fn model(&self) -> &str {
            "scripted-model"
        }
    }

    async fn service(llm: Option<Arc<dyn ChatBackend>>) -> RagService {
        let embedder = HashingEmbeddingClient::new(64);
        let store = InMemoryVectorStore::new();
        store.ensure_schema(64, embedder.model()).await.unwrap();
        let records: Vec<VectorRecord> = generate_profiles(80, Some(5))
            .iter()
            .map(|p| VectorRecord::from_profile(p, embedder.embed_sync(&p.embedding_text())))
            .collect();
        store.upsert(&records).await.unwrap();
        RagService::new(Arc::new(embedder), Arc::new(store), llm)
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity() {
        let rag = service(None).await;
        let results = rag
            .search_doctors("knee replacement surgery", &SearchFilter::default(), 5)
            .await
            .unwrap();
        assert_eq!(results.len(), 5);
        assert!(results
            .windows(2)
            .all(|w| w[0].similarity_score >= w[1].similarity_score));
        for r in &results {
            assert!((r.similarity_score - (1.0 - r.distance)).abs() < 1e-9);
            assert!((-1.0..=1.0).contains(&r.similarity_score));
        }
    }

    #[tokio::test]
    async fn test_search_applies_both_filters() {
        let rag = service(None).await;
        let filter = SearchFilter::new(
            Some("Chicago, IL".to_string()),
            Some("Oncology".to_string()),
        );
        let results = rag.search_doctors("tumor", &filter, 20).await.unwrap();
        assert!(results
            .iter()
            .all(|r| r.doctor.location == "Chicago, IL" && r.doctor.primary_specialty == "Oncology"));
    }

    #[tokio::test]
    async fn test_template_used_without_llm() {
        let rag = service(None).await;
        let results = rag
            .search_doctors("chest pain", &SearchFilter::default(), 5)
            .await
            .unwrap();
        let rec = rag.generate_recommendation("chest pain", &results).await;

        let top = rec.recommendation.as_ref().unwrap();
        assert_eq!(top, &results[0]);
        assert!(rec.explanation.contains(&top.doctor.name));
        assert!(rec.explanation.contains(&top.doctor.primary_specialty));
        assert_eq!(rec.alternative_options, results[1..3].to_vec());
        assert_eq!(rec.search_metadata.explanation_source, ExplanationSource::Template);
        assert_eq!(rec.search_metadata.model_used, None);
        assert_eq!(rec.search_metadata.total_results, 5);
    }

    #[tokio::test]
    async fn test_llm_text_becomes_explanation() {
        let llm = Arc::new(ScriptedLlm::new(Ok("Dr. X is the best fit.")));
        let rag = service(Some(llm.clone() as Arc<dyn ChatBackend>)).await;
        let results = rag
            .search_doctors("migraine", &SearchFilter::default(), 3)
            .await
            .unwrap();
        let rec = rag.generate_recommendation("migraine", &results).await;

        assert_eq!(rec.explanation, "Dr. X is the best fit.");
        assert_eq!(rec.recommendation.as_ref(), results.first());
        assert_eq!(rec.search_metadata.explanation_source, ExplanationSource::Llm);
        assert_eq!(rec.search_metadata.model_used.as_deref(), Some("scripted-model"));

        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].content, SYSTEM_PROMPT);
        assert!(seen[1].content.starts_with("Patient Query: migraine"));
        assert!(seen[1].content.contains(&format!("Doctor 3: {}", results[2].doctor.name)));
    }

    #[tokio::test]
    async fn test_llm_failure_falls_back_to_template() {
        let rag = service(Some(Arc::new(ScriptedLlm::new(Err(429))))).await;
        let results = rag
            .search_doctors("back pain", &SearchFilter::default(), 4)
            .await
            .unwrap();
        let rec = rag.generate_recommendation("back pain", &results).await;

        assert!(rec
            .explanation
            .starts_with("Error generating recommendation: API error (429): rate limited."));
        assert!(rec.explanation.contains(&results[0].doctor.name));
        assert_eq!(rec.search_metadata.explanation_source, ExplanationSource::LlmError);
    }

    #[tokio::test]
    async fn test_empty_candidates() {
        let rag = service(None).await;
        let rec = rag.generate_recommendation("anything", &[]).await;
        assert!(rec.recommendation.is_none());
        assert!(rec.alternative_options.is_empty());
        assert_eq!(rec.explanation, NO_CANDIDATES_EXPLANATION);
    }

    #[tokio::test]
    async fn test_process_query_without_matches() {
        let rag = service(None).await;
        let response = rag
            .process_patient_query(
                "heart",
                Some("Nowhere, ZZ".to_string()),
                None,
                5,
            )
            .await
            .unwrap();
        assert!(!response.success);
        assert!(response.recommendation.is_none());
        assert_eq!(response.message.as_deref(), Some(NO_MATCHES_MESSAGE));
    }

    #[tokio::test]
    async fn test_process_query_with_matches() {
        let rag = service(None).await;
        let response = rag
            .process_patient_query("severe chest pain and shortness of breath", None, None, 5)
            .await
            .unwrap();
        assert!(response.success);
        assert!(response.message.is_none());
        let rec = response.recommendation.unwrap();
        let top = rec.recommendation.unwrap();
        assert!(rec.explanation.contains(&top.doctor.name));
    }
}
