use crate::state::app_settings::AppSettings;
use log::info;
use mmpool_core::{AnalysisApi, ApiResult, PoolTeamSummary, PredictionsFile, TeamAnalysis, TeamEntry, TeamSource};

/// The team data source picked by the settings.
#[derive(Debug, Clone)]
pub enum DataSource {
    Api(AnalysisApi),
    Local(PredictionsFile),
}

impl DataSource {
    /// A predictions file takes precedence over the analysis service.
    pub fn open(settings: &AppSettings) -> ApiResult<Self> {
        match &settings.predictions_path {
            Some(path) => {
                info!("using local predictions from {}", path.display());
                Ok(DataSource::Local(PredictionsFile::load(path)?))
            }
            None => {
                info!("using analysis service at {}", settings.api_url);
                Ok(DataSource::Api(AnalysisApi::new(&settings.api_url)?))
            }
        }
    }
}

impl TeamSource for DataSource {
    async fn roster(&self) -> ApiResult<Vec<TeamEntry>> {
        match self {
            DataSource::Api(api) => api.roster().await,
            DataSource::Local(file) => TeamSource::roster(file).await,
        }
    }

    async fn analysis(&self, name: &str) -> ApiResult<TeamAnalysis> {
        match self {
            DataSource::Api(api) => api.analysis(name).await,
            DataSource::Local(file) => file.analysis(name).await,
        }
    }

    async fn pool_summaries(&self, names: &[String]) -> ApiResult<Vec<PoolTeamSummary>> {
        match self {
            DataSource::Api(api) => api.pool_summaries(names).await,
            DataSource::Local(file) => file.pool_summaries(names).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmpool_core::ApiError;
    use std::path::PathBuf;

    #[test]
    fn service_is_the_default_source() {
        let source = DataSource::open(&AppSettings::default()).unwrap();
        match source {
            DataSource::Api(api) => assert_eq!(api.base_url().as_str(), "http://localhost:8000/"),
            DataSource::Local(_) => panic!("expected the analysis service"),
        }
    }

    #[test]
    fn missing_predictions_file_is_not_found() {
        let settings = AppSettings {
            predictions_path: Some(PathBuf::from("/nonexistent/predictions.json")),
            ..AppSettings::default()
        };
        assert!(matches!(DataSource::open(&settings), Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn local_source_delegates_to_the_file() {
        let file = PredictionsFile::from_json(
            r#"[{"name": "Duke", "tournament_seed": 1, "win_probability_distribution": {"0": 0.2, "1": 0.3, "2+": 0.5}}]"#,
        )
        .unwrap();
        let source = DataSource::Local(file);

        let roster = source.roster().await.unwrap();
        assert_eq!(roster, vec![TeamEntry::new(1, "Duke")]);
        let summaries = source.pool_summaries(&["duke".to_string(), "Nobody".to_string()]).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert!(matches!(source.analysis("Nobody").await, Err(ApiError::NotFound(_))));
    }
}
