pub mod application;
pub mod connector;
pub mod domain;
pub mod forecast;

pub use application::{
    evaluate, CollectBatchUseCase, CollectOutcome, CollectRepositoryUseCase, DatasetStore,
    ForecastGrowthUseCase, ForecastSummary, HistorySampler, StarEventStream, StarSource,
    DEFAULT_SAMPLE_SIZE,
};

pub use connector::{
    GitHubStarSource, JsonDatasetStore, MockFailure, MockStarSource, RoutedStarSource,
    DEFAULT_BASE_URL,
};

pub use domain::{
    AccuracyReport, CollectedDataset, DomainError, ForecastPoint, ForecastResult, RepoIdentity,
    StarEvent, StarRecord, StatSnapshot, TimePoint, TimeSeries,
};

pub use forecast::{ForecastConfig, GrowthForecaster, SeasonalityMode};
