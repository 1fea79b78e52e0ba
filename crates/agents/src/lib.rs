mod budget;
mod excerpt;
mod memory;
mod settings;

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use thiserror::Error;
use tiptrip_catalog::{PlaceCatalog, RecommendationEngine, ReferencePlaceResolver};
use tiptrip_core::replies::{self, render_recommendations};
use tiptrip_core::{
    collapse_whitespace, general_info_prompt, AgentReply, GeneralQueryFailure, GeoPoint, Intent,
    PlaceRecord, ReplyOutcome, ResolutionFailure, SearchOrigin, DEFAULT_RADIUS_KM, MAX_RADIUS_KM,
    MIN_RADIUS_KM,
};
use tiptrip_observability::AppMetrics;
use tiptrip_oracle::{
    invoke_with_timeout, CategoryResolver, IntentClassifier, Oracle, OracleError,
};
use tiptrip_storage::UserLocationProvider;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub use budget::{ErrorBudget, DEFAULT_MAX_ERROR_COUNT};
pub use excerpt::{catalog_excerpt, render_excerpt};
pub use memory::{ConversationMemory, ConversationTurn};
pub use settings::AgentSettings;

#[derive(Debug, Error)]
pub enum ConsultError {
    #[error("intent classification failed")]
    Classification(#[source] OracleError),
}

pub struct ConversationalAgent<O, L> {
    catalog: Arc<PlaceCatalog>,
    oracle: Arc<O>,
    locations: Arc<L>,
    classifier: IntentClassifier<O>,
    categories: CategoryResolver<O>,
    references: ReferencePlaceResolver,
    engine: RecommendationEngine,
    budget: Arc<ErrorBudget>,
    memory: ConversationMemory,
    settings: AgentSettings,
    metrics: Arc<AppMetrics>,
}

impl<O, L> ConversationalAgent<O, L>
where
    O: Oracle,
    L: UserLocationProvider,
{
    pub fn new(
        catalog: Arc<PlaceCatalog>,
        oracle: Arc<O>,
        locations: Arc<L>,
        settings: AgentSettings,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            classifier: IntentClassifier::new(oracle.clone(), settings.oracle_timeout),
            categories: CategoryResolver::new(oracle.clone(), settings.oracle_timeout),
            references: ReferencePlaceResolver::default(),
            engine: RecommendationEngine::new(catalog.clone()),
            budget: Arc::new(ErrorBudget::new(settings.max_error_count)),
            memory: ConversationMemory::new(settings.memory_turns),
            catalog,
            oracle,
            locations,
            settings,
            metrics,
        }
    }

    pub fn budget(&self) -> &ErrorBudget {
        &self.budget
    }

    pub fn metrics(&self) -> &Arc<AppMetrics> {
        &self.metrics
    }

    pub fn catalog(&self) -> &Arc<PlaceCatalog> {
        &self.catalog
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub async fn consult_default(
        &self,
        question: &str,
        user_id: i64,
    ) -> Result<AgentReply, ConsultError> {
        self.consult(question, user_id, DEFAULT_RADIUS_KM).await
    }

    /// Answers one message. Only a failed intent classification is an error; every
    /// other failure is folded into the reply.
    #[instrument(skip(self, question), fields(request_id = %Uuid::new_v4()))]
    pub async fn consult(
        &self,
        question: &str,
        user_id: i64,
        radius_km: i64,
    ) -> Result<AgentReply, ConsultError> {
        let started = Instant::now();
        self.metrics.inc_consultation();
        let question = collapse_whitespace(question);

        if self.budget.exhausted() {
            self.metrics.inc_short_circuit();
            warn!(failures = self.budget.count(), "error budget exhausted");
            let reply = AgentReply::new(None, ReplyOutcome::Unavailable, replies::UNAVAILABLE);
            return Ok(self.finish(&question, user_id, reply, started));
        }

        self.metrics.inc_oracle_call();
        let intent = match self.classifier.classify(&question).await {
            Ok(intent) => intent,
            Err(err) => {
                self.metrics.inc_oracle_failure();
                self.metrics.observe_latency(started.elapsed());
                warn!(error = %err, "intent classification failed");
                return Err(ConsultError::Classification(err));
            }
        };

        let reply = match intent {
            Intent::Greeting => canned(intent, replies::GREETING),
            Intent::Farewell => canned(intent, replies::FAREWELL),
            Intent::Irrelevant => canned(intent, replies::IRRELEVANT),
            Intent::Unknown => canned(intent, replies::UNKNOWN),
            Intent::Nearby => self.nearby(intent, user_id, radius_km, None).await,
            Intent::NearbyCategory => self.nearby_category(&question, user_id, radius_km).await,
            Intent::ReferencePlace => self.reference_place(&question),
            Intent::GeneralInfo => self.general_info(&question, user_id).await,
        };

        Ok(self.finish(&question, user_id, reply, started))
    }

    fn finish(&self, question: &str, user_id: i64, reply: AgentReply, started: Instant) -> AgentReply {
        self.memory.record(
            user_id,
            ConversationTurn {
                at: Utc::now(),
                user_text: question.to_string(),
                reply_text: reply.reply_text.clone(),
                intent: reply.intent,
            },
        );

        let elapsed = started.elapsed();
        self.metrics.observe_latency(elapsed);
        info!(
            intent = reply.intent.map(Intent::label),
            outcome = outcome_kind(&reply.outcome),
            latency_ms = elapsed.as_millis() as u64,
            "consult handled"
        );
        reply
    }

    async fn nearby(
        &self,
        intent: Intent,
        user_id: i64,
        radius_km: i64,
        category: Option<String>,
    ) -> AgentReply {
        let Some(origin) = self.user_location(user_id).await else {
            return AgentReply::new(
                Some(intent),
                ReplyOutcome::LocationUnavailable { place: None },
                replies::USER_LOCATION_UNAVAILABLE,
            );
        };

        if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&radius_km) {
            return AgentReply::new(
                Some(intent),
                ReplyOutcome::InvalidRadius { radius_km },
                replies::INVALID_RADIUS,
            );
        }

        self.recommendations(
            intent,
            origin,
            SearchOrigin::User { user_id },
            radius_km as f64,
            category,
        )
    }

    async fn nearby_category(&self, question: &str, user_id: i64, radius_km: i64) -> AgentReply {
        let intent = Intent::NearbyCategory;

        self.metrics.inc_oracle_call();
        let category = match self.categories.resolve(question).await {
            Ok(category) => category,
            Err(err) => {
                self.metrics.inc_oracle_failure();
                warn!(error = %err, "category resolution failed");
                None
            }
        };

        match category {
            Some(category) => self.nearby(intent, user_id, radius_km, Some(category)).await,
            None => AgentReply::new(
                Some(intent),
                ReplyOutcome::Clarification {
                    reason: ResolutionFailure::Category,
                },
                replies::CATEGORY_CLARIFICATION,
            ),
        }
    }

    fn reference_place(&self, question: &str) -> AgentReply {
        let intent = Intent::ReferencePlace;

        let Some(place) = self.references.resolve(question, &self.catalog) else {
            return AgentReply::new(
                Some(intent),
                ReplyOutcome::Clarification {
                    reason: ResolutionFailure::ReferencePlace,
                },
                replies::REFERENCE_CLARIFICATION,
            );
        };

        let Some(origin) = place.coordinates() else {
            return AgentReply::new(
                Some(intent),
                ReplyOutcome::LocationUnavailable {
                    place: Some(place.name.clone()),
                },
                replies::place_location_unavailable(&place.name),
            );
        };

        self.recommendations(
            intent,
            origin,
            SearchOrigin::ReferencePlace {
                name: place.name.clone(),
            },
            self.settings.reference_radius_km,
            None,
        )
    }

    async fn general_info(&self, question: &str, user_id: i64) -> AgentReply {
        let intent = Intent::GeneralInfo;

        let excerpt = catalog_excerpt(
            &self.catalog,
            question,
            &self.settings.locale_marker,
            self.settings.excerpt_rows,
        );
        if excerpt.is_empty() {
            info!(marker = %self.settings.locale_marker, "no catalog rows for general question");
            return AgentReply::new(
                Some(intent),
                ReplyOutcome::NoInformation,
                replies::NO_INFORMATION,
            );
        }

        match self.ask_oracle(question, &excerpt, user_id).await {
            Ok(text) => {
                self.budget.reset();
                AgentReply::new(Some(intent), ReplyOutcome::Generated, text)
            }
            Err(failure) => {
                let failures = self.budget.increment();
                warn!(?failure, failures, "general query failed");
                AgentReply::new(
                    Some(intent),
                    ReplyOutcome::Apology { failure },
                    replies::apology(failure),
                )
            }
        }
    }

    async fn ask_oracle(
        &self,
        question: &str,
        excerpt: &[&PlaceRecord],
        user_id: i64,
    ) -> Result<String, GeneralQueryFailure> {
        let prompt = general_info_prompt(
            question,
            &render_excerpt(excerpt),
            &self.memory.transcript(user_id),
        );

        self.metrics.inc_oracle_call();
        let reply = invoke_with_timeout(self.oracle.as_ref(), &prompt, self.settings.oracle_timeout)
            .await
            .map_err(|err| {
                self.metrics.inc_oracle_failure();
                warn!(error = %err, oracle = self.oracle.name(), "general query oracle call failed");
                query_failure(&err)
            })?;

        let text = reply.text.trim();
        if text.is_empty() {
            self.metrics.inc_oracle_failure();
            return Err(GeneralQueryFailure::MalformedResponse);
        }
        Ok(text.to_string())
    }

    fn recommendations(
        &self,
        intent: Intent,
        origin: GeoPoint,
        search_origin: SearchOrigin,
        radius_km: f64,
        category: Option<String>,
    ) -> AgentReply {
        let places = self.engine.recommend(origin, radius_km, category.as_deref());
        self.metrics.add_places_recommended(places.len());

        let text = if places.is_empty() {
            replies::no_places_found(category.as_deref())
        } else {
            render_recommendations(&search_origin, category.as_deref(), &places, |name| {
                self.catalog.lookup(name)
            })
        };

        AgentReply::new(
            Some(intent),
            ReplyOutcome::Recommendations {
                origin: search_origin,
                category,
                radius_km,
                places,
            },
            text,
        )
    }

    async fn user_location(&self, user_id: i64) -> Option<GeoPoint> {
        match self.locations.get_coordinates(user_id).await {
            Ok(location) => location.filter(GeoPoint::is_valid),
            Err(err) => {
                warn!(user_id, error = %err, "user location lookup failed");
                None
            }
        }
    }
}

fn canned(intent: Intent, text: &str) -> AgentReply {
    AgentReply::new(Some(intent), ReplyOutcome::Canned, text)
}

fn query_failure(err: &OracleError) -> GeneralQueryFailure {
    match err {
        OracleError::Connectivity(_) | OracleError::Timeout(_) => GeneralQueryFailure::Connectivity,
        OracleError::MalformedRequest(_) | OracleError::MalformedResponse(_) => {
            GeneralQueryFailure::MalformedResponse
        }
        OracleError::NotConfigured(_) => GeneralQueryFailure::Unclassified,
    }
}

fn outcome_kind(outcome: &ReplyOutcome) -> &'static str {
    match outcome {
        ReplyOutcome::Canned => "canned",
        ReplyOutcome::Recommendations { .. } => "recommendations",
        ReplyOutcome::Clarification { .. } => "clarification",
        ReplyOutcome::LocationUnavailable { .. } => "location_unavailable",
        ReplyOutcome::InvalidRadius { .. } => "invalid_radius",
        ReplyOutcome::Generated => "generated",
        ReplyOutcome::NoInformation => "no_information",
        ReplyOutcome::Apology { .. } => "apology",
        ReplyOutcome::Unavailable => "unavailable",
    }
}
