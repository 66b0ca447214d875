//! # Pipeline - 股票推荐流水线
//!
//! 爬取 -> 情感聚合 -> 训练 -> 评估 -> 部署 的推荐流水线骨架
//!
//! ## 主要模块
//!
//! - `config`: 部署环境与流水线配置，静态注册表给出各环境的库表名
//! - `stages`: 爬取/训练/评估/部署四个阶段的类型化接口
//! - `pipeline`: 推荐流水线，驱动聚合与各阶段
//! - `types`: 错误类型与阶段输入输出

pub mod config;
pub mod pipeline;
pub mod stages;
pub mod types;

pub use config::{
    DeployConfig, MartConfig, MetaConfig, ModelConfig, PipelineConfig, Profile, TrainConfig,
};
pub use pipeline::{RecommendationPipeline, RecommendationPipelineBuilder};
pub use stages::{CrawlStage, DeployStage, EvaluateStage, TrainStage};
pub use types::{
    Deployment, EvaluationReport, PipelineError, PipelineResult, Recommendation, StockCandidate,
    TrainedModel,
};
