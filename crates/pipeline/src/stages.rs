//! 流水线阶段接口
//!
//! 爬取、训练、评估、部署四个阶段的类型化接口。
//! 具体实现由各阶段的容器镜像提供，这里只约定输入输出。

use crate::config::{DeployConfig, MartConfig};
use crate::types::{Deployment, EvaluationReport, PipelineResult, TrainedModel};
use async_trait::async_trait;
use sentiment::NewsRecord;

/// 爬取阶段：抓取新闻并产出带情感标签的记录
#[async_trait]
pub trait CrawlStage: Send + Sync {
    async fn crawl(&self, limit: usize) -> PipelineResult<Vec<NewsRecord>>;
}

/// 训练阶段：在数据集上训练 GNN 模型
#[async_trait]
pub trait TrainStage: Send + Sync {
    async fn train(&self, mart: &MartConfig) -> PipelineResult<TrainedModel>;
}

/// 评估阶段：在验证集上评估训练产出
#[async_trait]
pub trait EvaluateStage: Send + Sync {
    async fn evaluate(
        &self,
        model: &TrainedModel,
        mart: &MartConfig,
    ) -> PipelineResult<EvaluationReport>;
}

/// 部署阶段：把模型提升到配置指定的别名
#[async_trait]
pub trait DeployStage: Send + Sync {
    async fn deploy(
        &self,
        model: TrainedModel,
        config: &DeployConfig,
    ) -> PipelineResult<Deployment>;
}
