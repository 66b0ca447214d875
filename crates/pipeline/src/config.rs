//! 部署环境与流水线配置
//!
//! 配置在进程启动时构造一次并注入各协作方，不读全局状态。
//! 每个环境对应的表名等元信息由静态注册表给出，不做运行期动态查找。

use crate::types::PipelineError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 部署环境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Profile {
    Production,
    Development,
    Test,
}

impl Profile {
    /// 表名与实验名的前缀
    pub fn prefix(&self) -> &'static str {
        match self {
            Profile::Production => "ops",
            Profile::Development => "dev",
            Profile::Test => "test",
        }
    }
}

impl FromStr for Profile {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "ops" => Ok(Profile::Production),
            "development" | "dev" => Ok(Profile::Development),
            "test" => Ok(Profile::Test),
            other => Err(PipelineError::InvalidProfile(other.to_string())),
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Profile::Production => write!(f, "production"),
            Profile::Development => write!(f, "development"),
            Profile::Test => write!(f, "test"),
        }
    }
}

/// 元信息配置：库表名与实验名，均带环境前缀
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema: String,
    /// 新闻源表
    pub source_table: String,
    /// 股票情感指数产出表
    pub stock_sentiment_table: String,
    /// 关键词情感指数产出表
    pub keyword_sentiment_table: String,
    /// 最终推荐产出表
    pub recommendation_table: String,
    /// MLflow 实验名
    pub experiment_name: String,
}

impl MetaConfig {
    /// 环境到元信息的静态注册表
    pub fn for_profile(profile: Profile) -> Self {
        let prefix = profile.prefix();
        Self {
            schema: "recsys".to_string(),
            source_table: format!("{prefix}_news_article"),
            stock_sentiment_table: format!("{prefix}_stock_sentiment"),
            keyword_sentiment_table: format!("{prefix}_keyword_sentiment"),
            recommendation_table: format!("{prefix}_stock_recommendation"),
            experiment_name: format!("{prefix}_graph_sage"),
        }
    }
}

/// 训练/验证数据集文件名
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MartConfig {
    pub train_mart: String,
    pub test_mart: String,
}

impl Default for MartConfig {
    fn default() -> Self {
        Self {
            train_mart: "train_mart.parquet".to_string(),
            test_mart: "test_mart.parquet".to_string(),
        }
    }
}

/// 模型结构配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub hidden_dim: usize,
    pub num_layers: usize,
    pub learning_rate: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "GraphSAGE".to_string(),
            hidden_dim: 100,
            num_layers: 10,
            learning_rate: 0.0005,
        }
    }
}

/// 训练过程配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub num_workers: usize,
    pub num_epochs: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            num_workers: 4,
            num_epochs: 10,
        }
    }
}

/// 部署配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    pub model_name: String,
    /// 生产流量指向的模型别名
    pub model_alias: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            model_name: "GraphSAGE".to_string(),
            model_alias: "Champion".to_string(),
        }
    }
}

/// 流水线配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub profile: Profile,
    pub meta: MetaConfig,
    pub mart: MartConfig,
    pub model: ModelConfig,
    pub train: TrainConfig,
    pub deploy: DeployConfig,
    /// 情感时间权重衰减率，每天减少的比例
    pub decay_rate: f64,
}

impl PipelineConfig {
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            profile,
            meta: MetaConfig::for_profile(profile),
            mart: MartConfig::default(),
            model: ModelConfig::default(),
            train: TrainConfig::default(),
            deploy: DeployConfig::default(),
            decay_rate: 0.1,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::for_profile(Profile::Development)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_str() {
        assert_eq!("production".parse::<Profile>().unwrap(), Profile::Production);
        assert_eq!("ops".parse::<Profile>().unwrap(), Profile::Production);
        assert_eq!("Development".parse::<Profile>().unwrap(), Profile::Development);
        assert_eq!("dev".parse::<Profile>().unwrap(), Profile::Development);
        assert_eq!("test".parse::<Profile>().unwrap(), Profile::Test);
    }

    #[test]
    fn test_profile_from_str_rejects_unknown() {
        let err = "staging".parse::<Profile>().unwrap_err();
        assert!(matches!(err, PipelineError::InvalidProfile(ref s) if s == "staging"));
    }

    #[test]
    fn test_meta_config_carries_profile_prefix() {
        let meta = MetaConfig::for_profile(Profile::Production);
        assert_eq!(meta.source_table, "ops_news_article");
        assert_eq!(meta.recommendation_table, "ops_stock_recommendation");
        assert_eq!(meta.experiment_name, "ops_graph_sage");

        let meta = MetaConfig::for_profile(Profile::Test);
        assert!(meta.stock_sentiment_table.starts_with("test_"));
    }

    #[test]
    fn test_pipeline_config_serde() {
        let config = PipelineConfig::for_profile(Profile::Development);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PipelineConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.profile, Profile::Development);
        assert_eq!(parsed.model.name, "GraphSAGE");
        assert_eq!(parsed.train.num_epochs, 10);
        assert_eq!(parsed.deploy.model_alias, "Champion");
    }
}
