use crate::{
    spotify::CatalogSearch,
    types::{TrackDescriptor, TrackHit},
};

/// Results requested per search; ranking is left to the catalog.
pub const SEARCH_LIMIT: u32 = 1;

/// Decides whether the catalog's best hit is accepted for a descriptor.
pub trait MatchPolicy: Send + Sync {
    fn accept(&self, descriptor: &TrackDescriptor, hit: &TrackHit) -> bool;
}

/// Accepts whatever the catalog ranks first.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstResult;

impl MatchPolicy for FirstResult {
    fn accept(&self, _descriptor: &TrackDescriptor, _hit: &TrackHit) -> bool {
        true
    }
}

impl<F> MatchPolicy for F
where
    F: Fn(&TrackDescriptor, &TrackHit) -> bool + Send + Sync,
{
    fn accept(&self, descriptor: &TrackDescriptor, hit: &TrackHit) -> bool {
        self(descriptor, hit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Found(TrackHit),
    NoResult,
    Rejected(TrackHit),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMatch {
    pub descriptor: TrackDescriptor,
    pub query: String,
    pub outcome: MatchOutcome,
}

impl CatalogMatch {
    pub fn track_id(&self) -> Option<&str> {
        match &self.outcome {
            MatchOutcome::Found(hit) => Some(hit.uri.as_str()),
            _ => None,
        }
    }
}

/// Ids of all found matches, in input order. Duplicates are kept.
pub fn target_ids(matches: &[CatalogMatch]) -> Vec<String> {
    matches
        .iter()
        .filter_map(|m| m.track_id().map(str::to_string))
        .collect()
}

pub struct CatalogResolver<'a, C: ?Sized> {
    catalog: &'a C,
    market: String,
    policy: Box<dyn MatchPolicy + 'a>,
}

impl<'a, C: CatalogSearch + ?Sized> CatalogResolver<'a, C> {
    pub fn new(catalog: &'a C, market: impl Into<String>) -> Self {
        Self {
            catalog,
            market: market.into(),
            policy: Box::new(FirstResult),
        }
    }

    pub fn with_policy(mut self, policy: impl MatchPolicy + 'a) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub async fn resolve(&self, descriptors: &[TrackDescriptor]) -> Vec<CatalogMatch> {
        self.resolve_with(descriptors, |_, _| {}).await
    }

    /// Resolves every descriptor in order, one search at a time, and calls
    /// `on_match` with the 1-based index after each one.
    pub async fn resolve_with<F>(
        &self,
        descriptors: &[TrackDescriptor],
        mut on_match: F,
    ) -> Vec<CatalogMatch>
    where
        F: FnMut(usize, &CatalogMatch),
    {
        let mut matches = Vec::with_capacity(descriptors.len());

        for (index, descriptor) in descriptors.iter().enumerate() {
            let m = self.resolve_one(descriptor).await;
            on_match(index + 1, &m);
            matches.push(m);
        }

        matches
    }

    async fn resolve_one(&self, descriptor: &TrackDescriptor) -> CatalogMatch {
        let query = descriptor.query();

        let outcome = match self
            .catalog
            .search_tracks(&query, SEARCH_LIMIT, &self.market)
            .await
        {
            Ok(hits) => match hits.into_iter().next() {
                Some(hit) if self.policy.accept(descriptor, &hit) => MatchOutcome::Found(hit),
                Some(hit) => MatchOutcome::Rejected(hit),
                None => MatchOutcome::NoResult,
            },
            Err(e) => MatchOutcome::Failed(e.to_string()),
        };

        CatalogMatch {
            descriptor: descriptor.clone(),
            query,
            outcome,
        }
    }
}
