//! # API Endpoint Handlers
//!
//! One handler per route. Reads take the store's read lock, creates take the
//! write lock; neither is held across an await.

use super::{
    AppState,
    error::ApiError,
    types::{HealthResponse, RelatedPapersQuery},
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use learnhub_core::{
    CodeImplementation, Concept, ConceptDetail, Experiment, FieldError, InsertSchema,
    NewCodeImplementation, NewConcept, NewExperiment, NewPaper, NewTheoryContent, Paper,
    RecordId, TheoryContent, ValidationErrors,
};
use serde_json::Value;

type ApiResult<T> = Result<Json<T>, ApiError>;
type Created<T> = Result<(StatusCode, Json<T>), ApiError>;

// =============================================================================
// HELPERS
// =============================================================================

/// Parse a numeric path segment. Anything that is not an unsigned integer
/// matches no record.
fn parse_id(raw: &str) -> Option<RecordId> {
    raw.parse::<u64>().ok().map(RecordId)
}

fn invalid_message<T: InsertSchema>() -> String {
    format!("Invalid {} data", T::ENTITY)
}

/// Turn a raw JSON body into a validated insert shape.
fn parse_body<T: InsertSchema>(body: Result<Json<Value>, JsonRejection>) -> Result<T, ApiError> {
    let Json(value) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected request body");
        ApiError::Validation {
            message: invalid_message::<T>(),
            errors: ValidationErrors(vec![FieldError::invalid_json(rejection.body_text())]),
        }
    })?;

    T::parse(&value).map_err(|errors| ApiError::Validation {
        message: invalid_message::<T>(),
        errors,
    })
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Liveness plus row counts.
pub async fn health_handler(State(state): State<AppState>) -> ApiResult<HealthResponse> {
    let store = state.store.read().await;
    let counts = store
        .counts()
        .map_err(|e| ApiError::store("Failed to count records", None, e))?;
    Ok(Json(HealthResponse::ok(counts)))
}

// =============================================================================
// CONCEPT HANDLERS
// =============================================================================

pub async fn list_concepts(State(state): State<AppState>) -> ApiResult<Vec<Concept>> {
    let store = state.store.read().await;
    let concepts = store
        .get_all_concepts()
        .map_err(|e| ApiError::store("Failed to fetch concepts", None, e))?;
    Ok(Json(concepts))
}

pub async fn concepts_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<Vec<Concept>> {
    let store = state.store.read().await;
    let concepts = store
        .get_concepts_by_category(&category)
        .map_err(|e| ApiError::store("Failed to fetch concepts by category", Some(category), e))?;
    Ok(Json(concepts))
}

/// Composite concept view: the concept plus its theory, code and experiments.
pub async fn concept_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<ConceptDetail> {
    let store = state.store.read().await;
    match store.get_concept_detail(&slug) {
        Ok(Some(detail)) => Ok(Json(detail)),
        Ok(None) => Err(ApiError::NotFound("Concept not found")),
        Err(e) => Err(ApiError::store("Failed to fetch concept", Some(slug), e)),
    }
}

pub async fn create_concept(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Created<Concept> {
    let input: NewConcept = parse_body(body)?;
    let slug = input.slug.clone();

    let mut store = state.store.write().await;
    let concept = store
        .create_concept(input)
        .map_err(|e| ApiError::store("Failed to create concept", Some(slug), e))?;

    tracing::info!(id = %concept.id, slug = %concept.slug, "concept created");
    Ok((StatusCode::CREATED, Json(concept)))
}

// =============================================================================
// THEORY HANDLERS
// =============================================================================

pub async fn theory_for_concept(
    State(state): State<AppState>,
    Path(concept_id): Path<String>,
) -> ApiResult<TheoryContent> {
    let Some(id) = parse_id(&concept_id) else {
        return Err(ApiError::NotFound("Theory content not found"));
    };

    let store = state.store.read().await;
    match store.get_theory_by_concept_id(id) {
        Ok(Some(theory)) => Ok(Json(theory)),
        Ok(None) => Err(ApiError::NotFound("Theory content not found")),
        Err(e) => Err(ApiError::store(
            "Failed to fetch theory content",
            Some(concept_id),
            e,
        )),
    }
}

pub async fn create_theory(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Created<TheoryContent> {
    let input: NewTheoryContent = parse_body(body)?;
    let key = input.concept_id.to_string();

    let mut store = state.store.write().await;
    let theory = store
        .create_theory_content(input)
        .map_err(|e| ApiError::store("Failed to create theory content", Some(key), e))?;

    tracing::info!(id = %theory.id, concept_id = %theory.concept_id, "theory content created");
    Ok((StatusCode::CREATED, Json(theory)))
}

// =============================================================================
// CODE HANDLERS
// =============================================================================

pub async fn code_for_concept(
    State(state): State<AppState>,
    Path(concept_id): Path<String>,
) -> ApiResult<Vec<CodeImplementation>> {
    let Some(id) = parse_id(&concept_id) else {
        return Ok(Json(Vec::new()));
    };

    let store = state.store.read().await;
    let implementations = store
        .get_code_implementations_by_concept_id(id)
        .map_err(|e| {
            ApiError::store("Failed to fetch code implementations", Some(concept_id), e)
        })?;
    Ok(Json(implementations))
}

pub async fn create_code(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Created<CodeImplementation> {
    let input: NewCodeImplementation = parse_body(body)?;
    let key = input.concept_id.to_string();

    let mut store = state.store.write().await;
    let implementation = store
        .create_code_implementation(input)
        .map_err(|e| ApiError::store("Failed to create code implementation", Some(key), e))?;

    tracing::info!(
        id = %implementation.id,
        concept_id = %implementation.concept_id,
        language = %implementation.language,
        "code implementation created"
    );
    Ok((StatusCode::CREATED, Json(implementation)))
}

// =============================================================================
// EXPERIMENT HANDLERS
// =============================================================================

pub async fn experiments_for_concept(
    State(state): State<AppState>,
    Path(concept_id): Path<String>,
) -> ApiResult<Vec<Experiment>> {
    let Some(id) = parse_id(&concept_id) else {
        return Ok(Json(Vec::new()));
    };

    let store = state.store.read().await;
    let experiments = store
        .get_experiments_by_concept_id(id)
        .map_err(|e| ApiError::store("Failed to fetch experiments", Some(concept_id), e))?;
    Ok(Json(experiments))
}

pub async fn create_experiment(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Created<Experiment> {
    let input: NewExperiment = parse_body(body)?;
    let key = input.concept_id.to_string();

    let mut store = state.store.write().await;
    let experiment = store
        .create_experiment(input)
        .map_err(|e| ApiError::store("Failed to create experiment", Some(key), e))?;

    tracing::info!(id = %experiment.id, concept_id = %experiment.concept_id, "experiment created");
    Ok((StatusCode::CREATED, Json(experiment)))
}

// =============================================================================
// PAPER HANDLERS
// =============================================================================

pub async fn list_papers(State(state): State<AppState>) -> ApiResult<Vec<Paper>> {
    let store = state.store.read().await;
    let papers = store
        .get_all_papers()
        .map_err(|e| ApiError::store("Failed to fetch papers", None, e))?;
    Ok(Json(papers))
}

/// Papers sharing at least one tag with `?concepts=a,b`.
pub async fn related_papers(
    State(state): State<AppState>,
    Query(query): Query<RelatedPapersQuery>,
) -> ApiResult<Vec<Paper>> {
    let tags = query.tags();
    let store = state.store.read().await;
    let papers = store
        .get_related_papers_by_concepts(&tags)
        .map_err(|e| ApiError::store("Failed to fetch related papers", Some(tags.join(",")), e))?;
    Ok(Json(papers))
}

pub async fn paper_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Paper> {
    let Some(id) = parse_id(&raw_id) else {
        return Err(ApiError::NotFound("Paper not found"));
    };

    let store = state.store.read().await;
    match store.get_paper_by_id(id) {
        Ok(Some(paper)) => Ok(Json(paper)),
        Ok(None) => Err(ApiError::NotFound("Paper not found")),
        Err(e) => Err(ApiError::store("Failed to fetch paper", Some(raw_id), e)),
    }
}

pub async fn create_paper(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Created<Paper> {
    let input: NewPaper = parse_body(body)?;
    let key = input.title.clone();

    let mut store = state.store.write().await;
    let paper = store
        .create_paper(input)
        .map_err(|e| ApiError::store("Failed to create paper", Some(key), e))?;

    tracing::info!(id = %paper.id, year = paper.year, "paper created");
    Ok((StatusCode::CREATED, Json(paper)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_only_unsigned_integers() {
        assert_eq!(parse_id("7"), Some(RecordId(7)));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id("1.5"), None);
        assert_eq!(parse_id("1abc"), None);
        assert_eq!(parse_id(""), None);
    }

    #[test]
    fn invalid_message_names_the_entity() {
        assert_eq!(invalid_message::<NewConcept>(), "Invalid concept data");
        assert_eq!(
            invalid_message::<NewCodeImplementation>(),
            "Invalid code implementation data"
        );
        assert_eq!(invalid_message::<NewTheoryContent>(), "Invalid theory content data");
    }
}
