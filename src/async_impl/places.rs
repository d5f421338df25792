use crate::async_impl::{
    deliver_list, deliver_one, rejected, Callback, EmptyResults, ServiceContext,
};
use crate::error::ServiceError;
use crate::places::{
    place_prediction, project_place, query_prediction, AutocompletePrediction,
    AutocompletionRequest, FieldSelection, FindPlaceFromQueryRequest, LocationQuery,
    PlaceDetailsRequest, PlaceResult, QueryAutocompletePrediction, QueryAutocompletionRequest,
    TextSearchRequest,
};
use crate::shared::location::{
    GetPlaceRequest, SearchPlaceIndexForSuggestionsRequest, SearchPlaceIndexForTextRequest,
    SearchPlaceIndexResponse, SuggestionResult,
};
use crate::status::PlacesServiceStatus;

type Status = PlacesServiceStatus;

fn unknown(operation: &'static str) -> impl FnOnce(crate::error::LocationError) -> Status {
    move |error| rejected::<Status>(operation, error)
}

/// Search, lookup and detail queries against the place index
#[derive(Clone, Debug)]
pub struct PlacesService {
    context: ServiceContext,
}

impl PlacesService {
    pub fn new(context: ServiceContext) -> PlacesService {
        PlacesService { context }
    }

    async fn search_text(
        &self,
        text: &str,
        location: &LocationQuery,
        language: &Option<String>,
    ) -> Result<SearchPlaceIndexResponse, Status> {
        let param = location.resolve();
        self.context
            .backend()
            .search_place_index_for_text(&SearchPlaceIndexForTextRequest {
                index_name: self.context.place_index().to_string(),
                text: text.to_string(),
                bias_position: param.and_then(|param| param.bias_position()),
                filter_bbox: param.and_then(|param| param.filter_bbox()),
                language: self.context.language(language),
                ..Default::default()
            })
            .await
            .map_err(unknown("SearchPlaceIndexForText"))
    }

    /// Find places matching a query, projecting only the requested fields.
    ///
    /// No match is `OK` with an empty list.
    pub async fn find_place_from_query(
        &self,
        request: &FindPlaceFromQueryRequest,
        callback: Option<Callback<Vec<PlaceResult>, Status>>,
    ) -> Result<Vec<PlaceResult>, ServiceError<Status>> {
        let outcome = self.find_place(request).await;
        deliver_list(callback, outcome)
    }

    async fn find_place(
        &self,
        request: &FindPlaceFromQueryRequest,
    ) -> Result<Vec<PlaceResult>, Status> {
        if request.query.trim().is_empty() {
            return Err(Status::InvalidRequest);
        }
        let fields = FieldSelection::from_fields(request.fields.as_slice());
        let response = self
            .search_text(&request.query, &request.location_query(), &request.language)
            .await?;
        let results: Vec<PlaceResult> = response
            .results
            .iter()
            .map(|result| project_place(result.place_id.as_deref(), &result.place, &fields, false))
            .collect();
        EmptyResults::Ok.apply(results)
    }

    /// Fetch one place. Detail-tier fields are included unless a field list
    /// leaves them out.
    pub async fn get_details(
        &self,
        request: &PlaceDetailsRequest,
        callback: Option<Callback<Option<PlaceResult>, Status>>,
    ) -> Result<PlaceResult, ServiceError<Status>> {
        let outcome = self.details(request).await;
        deliver_one(callback, outcome)
    }

    async fn details(&self, request: &PlaceDetailsRequest) -> Result<PlaceResult, Status> {
        if request.place_id.is_empty() {
            return Err(Status::InvalidRequest);
        }
        let response = self
            .context
            .backend()
            .get_place(&GetPlaceRequest {
                index_name: self.context.place_index().to_string(),
                place_id: request.place_id.clone(),
                language: self.context.language(&request.language),
            })
            .await
            .map_err(unknown("GetPlace"))?;
        Ok(project_place(
            Some(request.place_id.as_str()),
            &response.place,
            &request.field_selection(),
            true,
        ))
    }

    /// Free-text search returning every list-tier field.
    ///
    /// No match is `OK` with an empty list.
    pub async fn text_search(
        &self,
        request: &TextSearchRequest,
        callback: Option<Callback<Vec<PlaceResult>, Status>>,
    ) -> Result<Vec<PlaceResult>, ServiceError<Status>> {
        let outcome = self.search(request).await;
        deliver_list(callback, outcome)
    }

    async fn search(&self, request: &TextSearchRequest) -> Result<Vec<PlaceResult>, Status> {
        if request.query.trim().is_empty() {
            return Err(Status::InvalidRequest);
        }
        let response = self
            .search_text(&request.query, &request.location_query(), &request.language)
            .await?;
        let results: Vec<PlaceResult> = response
            .results
            .iter()
            .map(|result| {
                project_place(
                    result.place_id.as_deref(),
                    &result.place,
                    &FieldSelection::All,
                    false,
                )
            })
            .collect();
        EmptyResults::Ok.apply(results)
    }
}

/// Type-ahead predictions from the place index
#[derive(Clone, Debug)]
pub struct AutocompleteService {
    context: ServiceContext,
}

impl AutocompleteService {
    pub fn new(context: ServiceContext) -> AutocompleteService {
        AutocompleteService { context }
    }

    async fn suggest(
        &self,
        input: &str,
        location: &LocationQuery,
        language: &Option<String>,
    ) -> Result<Vec<SuggestionResult>, Status> {
        if input.trim().is_empty() {
            return Err(Status::InvalidRequest);
        }
        let param = location.resolve();
        let response = self
            .context
            .backend()
            .search_place_index_for_suggestions(&SearchPlaceIndexForSuggestionsRequest {
                index_name: self.context.place_index().to_string(),
                text: input.to_string(),
                bias_position: param.and_then(|param| param.bias_position()),
                filter_bbox: param.and_then(|param| param.filter_bbox()),
                language: self.context.language(language),
                max_results: None,
            })
            .await
            .map_err(unknown("SearchPlaceIndexForSuggestions"))?;
        Ok(response.results)
    }

    /// Query predictions; no suggestion is `OK` with an empty list
    pub async fn get_query_predictions(
        &self,
        request: &QueryAutocompletionRequest,
        callback: Option<Callback<Vec<QueryAutocompletePrediction>, Status>>,
    ) -> Result<Vec<QueryAutocompletePrediction>, ServiceError<Status>> {
        let outcome = self
            .suggest(&request.input, &request.location_query(), &request.language)
            .await
            .and_then(|suggestions| {
                EmptyResults::Ok.apply(suggestions.iter().map(query_prediction).collect::<Vec<_>>())
            });
        deliver_list(callback, outcome)
    }

    /// Place predictions; suggestions without a place identifier are
    /// dropped, and nothing left is `ZERO_RESULTS`
    pub async fn get_place_predictions(
        &self,
        request: &AutocompletionRequest,
        callback: Option<Callback<Vec<AutocompletePrediction>, Status>>,
    ) -> Result<Vec<AutocompletePrediction>, ServiceError<Status>> {
        let outcome = self
            .suggest(&request.input, &request.location_query(), &request.language)
            .await
            .and_then(|suggestions| {
                EmptyResults::ZeroResults
                    .apply(suggestions.iter().filter_map(place_prediction).collect::<Vec<_>>())
            });
        deliver_list(callback, outcome)
    }
}
