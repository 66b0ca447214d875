//! 核心类型定义

use sentiment::SentimentGrade;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("未知的部署环境: {0}")]
    InvalidProfile(String),

    #[error("爬取任务失败: {0}")]
    Crawl(String),

    #[error("训练任务失败: {0}")]
    Train(String),

    #[error("评估任务失败: {0}")]
    Evaluate(String),

    #[error("部署任务失败: {0}")]
    Deploy(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 训练任务产出的模型句柄
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    /// 模型名称
    pub name: String,
    /// 训练运行标识
    pub run_id: String,
    /// 所属实验名
    pub experiment: String,
}

/// 评估报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub model_name: String,
    /// 推荐列表前 10 的命中精度
    pub precision_at_10: f64,
    /// 推荐列表前 10 的召回率
    pub recall_at_10: f64,
}

/// 部署结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub model_name: String,
    /// 部署别名，生产流量指向该别名
    pub alias: String,
}

/// 候选股票，关联度来自关键词匹配，取值 0~10
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockCandidate {
    pub stock: String,
    pub keyword_relevance: f64,
}

/// 最终推荐条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub stock: String,
    /// 最终推荐分数，大致落在 [-40, 100]
    pub final_score: f64,
    /// 参与打分的（加权）情感指数
    pub sentiment_index: f64,
    pub grade: SentimentGrade,
}
