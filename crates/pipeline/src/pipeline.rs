//! 推荐流水线
//!
//! 把爬取产出的新闻记录送入情感聚合器，产出排名与最终推荐，
//! 并按 训练 -> 评估 -> 部署 的顺序驱动模型阶段。

use crate::config::{PipelineConfig, Profile};
use crate::stages::{CrawlStage, DeployStage, EvaluateStage, TrainStage};
use crate::types::{Deployment, PipelineResult, Recommendation, StockCandidate};
use chrono::NaiveDateTime;
use sentiment::{
    recommendation_score, EntitySentiment, NewsRecord, SentimentAggregator, SentimentGrade,
    WeightedEntitySentiment,
};
use std::collections::HashMap;

/// 推荐流水线
pub struct RecommendationPipeline {
    config: PipelineConfig,
    aggregator: SentimentAggregator,
}

impl RecommendationPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let aggregator = SentimentAggregator::new(config.decay_rate);
        Self { config, aggregator }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// 按股票聚合情感指数
    pub fn rank_stocks(&self, rows: &[NewsRecord]) -> Vec<EntitySentiment> {
        self.aggregator.aggregate_stocks(rows, true)
    }

    /// 按关键词聚合情感指数
    pub fn rank_keywords(&self, rows: &[NewsRecord]) -> Vec<EntitySentiment> {
        self.aggregator.aggregate_keywords(rows)
    }

    /// 按股票聚合时间加权情感指数，以当前时间为基准
    pub fn rank_stocks_weighted(&self, rows: &[NewsRecord]) -> Vec<WeightedEntitySentiment> {
        self.aggregator.aggregate_stocks_weighted(rows, true)
    }

    /// 按股票聚合时间加权情感指数，以指定时间为基准
    pub fn rank_stocks_weighted_at(
        &self,
        rows: &[NewsRecord],
        reference: NaiveDateTime,
    ) -> Vec<WeightedEntitySentiment> {
        self.aggregator.aggregate_stocks_weighted_at(rows, true, reference)
    }

    /// 驱动爬取阶段并对产出做股票排名
    pub async fn crawl_and_rank(
        &self,
        crawler: &dyn CrawlStage,
        limit: usize,
    ) -> PipelineResult<Vec<EntitySentiment>> {
        let rows = crawler.crawl(limit).await?;
        tracing::info!(
            "Crawled {} records into {}",
            rows.len(),
            self.config.meta.source_table
        );
        Ok(self.rank_stocks(&rows))
    }

    /// 合成最终推荐，以当前时间为加权基准
    pub fn recommend(
        &self,
        rows: &[NewsRecord],
        candidates: &[StockCandidate],
    ) -> Vec<Recommendation> {
        let ranked = self.rank_stocks_weighted(rows);
        self.merge_candidates(&ranked, candidates)
    }

    /// 合成最终推荐，以指定时间为加权基准
    ///
    /// 候选股票的关键词关联度与其加权情感指数合成最终分数，
    /// 没有任何新闻提及的候选按情感指数 0.0 参与打分。
    pub fn recommend_at(
        &self,
        rows: &[NewsRecord],
        candidates: &[StockCandidate],
        reference: NaiveDateTime,
    ) -> Vec<Recommendation> {
        let ranked = self.rank_stocks_weighted_at(rows, reference);
        self.merge_candidates(&ranked, candidates)
    }

    fn merge_candidates(
        &self,
        ranked: &[WeightedEntitySentiment],
        candidates: &[StockCandidate],
    ) -> Vec<Recommendation> {
        let index_by_stock: HashMap<&str, f64> = ranked
            .iter()
            .map(|r| (r.entity.as_str(), r.weighted_sentiment_index))
            .collect();

        let mut recommendations: Vec<Recommendation> = candidates
            .iter()
            .map(|candidate| {
                let sentiment_index = index_by_stock
                    .get(candidate.stock.as_str())
                    .copied()
                    .unwrap_or(0.0);

                Recommendation {
                    stock: candidate.stock.clone(),
                    final_score: recommendation_score(
                        candidate.keyword_relevance,
                        sentiment_index,
                    ),
                    sentiment_index,
                    grade: SentimentGrade::from_index(sentiment_index),
                }
            })
            .collect();

        recommendations.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        tracing::info!("Produced {} recommendations", recommendations.len());
        recommendations
    }

    /// 按 训练 -> 评估 -> 部署 的顺序驱动模型阶段
    pub async fn run_training(
        &self,
        trainer: &dyn TrainStage,
        evaluator: &dyn EvaluateStage,
        deployer: &dyn DeployStage,
    ) -> PipelineResult<Deployment> {
        tracing::info!(
            "Training {} for experiment {}",
            self.config.model.name,
            self.config.meta.experiment_name
        );
        let model = trainer.train(&self.config.mart).await?;

        let report = evaluator.evaluate(&model, &self.config.mart).await?;
        tracing::info!(
            "Evaluated {}: precision@10 {:.3}, recall@10 {:.3}",
            report.model_name,
            report.precision_at_10,
            report.recall_at_10
        );

        let deployment = deployer.deploy(model, &self.config.deploy).await?;
        tracing::info!(
            "Deployed {} as alias {}",
            deployment.model_name,
            deployment.alias
        );
        Ok(deployment)
    }
}

/// 流水线构建器
pub struct RecommendationPipelineBuilder {
    profile: Profile,
    decay_rate: f64,
}

impl RecommendationPipelineBuilder {
    pub fn new() -> Self {
        Self {
            profile: Profile::Development,
            decay_rate: 0.1,
        }
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_decay_rate(mut self, decay_rate: f64) -> Self {
        self.decay_rate = decay_rate;
        self
    }

    pub fn build(self) -> RecommendationPipeline {
        let mut config = PipelineConfig::for_profile(self.profile);
        config.decay_rate = self.decay_rate;
        RecommendationPipeline::new(config)
    }
}

impl Default for RecommendationPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DeployConfig, MartConfig};
    use crate::types::{EvaluationReport, PipelineError, TrainedModel};
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct FixtureCrawler;

    #[async_trait]
    impl CrawlStage for FixtureCrawler {
        async fn crawl(&self, _limit: usize) -> PipelineResult<Vec<NewsRecord>> {
            Ok(vec![
                NewsRecord {
                    related_stocks: Some("005930,000660".to_string()),
                    stocks_sentiment: Some("긍정".to_string()),
                    ..NewsRecord::default()
                },
                NewsRecord {
                    related_stocks: Some("005930".to_string()),
                    stocks_sentiment: Some("부정".to_string()),
                    ..NewsRecord::default()
                },
            ])
        }
    }

    struct FixtureTrainer;

    #[async_trait]
    impl TrainStage for FixtureTrainer {
        async fn train(&self, _mart: &MartConfig) -> PipelineResult<TrainedModel> {
            Ok(TrainedModel {
                name: "GraphSAGE".to_string(),
                run_id: "run-001".to_string(),
                experiment: "dev_graph_sage".to_string(),
            })
        }
    }

    struct FailingTrainer;

    #[async_trait]
    impl TrainStage for FailingTrainer {
        async fn train(&self, _mart: &MartConfig) -> PipelineResult<TrainedModel> {
            Err(PipelineError::Train("out of memory".to_string()))
        }
    }

    struct FixtureEvaluator;

    #[async_trait]
    impl EvaluateStage for FixtureEvaluator {
        async fn evaluate(
            &self,
            model: &TrainedModel,
            _mart: &MartConfig,
        ) -> PipelineResult<EvaluationReport> {
            Ok(EvaluationReport {
                model_name: model.name.clone(),
                precision_at_10: 0.42,
                recall_at_10: 0.31,
            })
        }
    }

    struct FixtureDeployer;

    #[async_trait]
    impl DeployStage for FixtureDeployer {
        async fn deploy(
            &self,
            model: TrainedModel,
            config: &DeployConfig,
        ) -> PipelineResult<Deployment> {
            Ok(Deployment {
                model_name: model.name,
                alias: config.model_alias.clone(),
            })
        }
    }

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 8)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_crawl_and_rank() {
        let pipeline = RecommendationPipelineBuilder::new().build();
        let ranked = pipeline.crawl_and_rank(&FixtureCrawler, 10).await.unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].entity, "000660");
        assert_eq!(ranked[0].sentiment_index, 1.0);
        assert_eq!(ranked[1].entity, "005930");
        assert_eq!(ranked[1].sentiment_index, 0.0);
    }

    #[test]
    fn test_recommend_ranks_by_final_score() {
        let pipeline = RecommendationPipelineBuilder::new().build();
        let rows = vec![NewsRecord {
            related_stocks: Some("005930".to_string()),
            stocks_sentiment: Some("긍정".to_string()),
            pub_date: Some("2025/01/08".into()),
            ..NewsRecord::default()
        }];
        let candidates = vec![
            StockCandidate {
                stock: "000660".to_string(),
                keyword_relevance: 8.0,
            },
            StockCandidate {
                stock: "005930".to_string(),
                keyword_relevance: 10.0,
            },
        ];

        let recommendations = pipeline.recommend_at(&rows, &candidates, reference());

        // 005930: 10×6 + 1.0×40 = 100，000660 没有新闻，按指数 0.0 计: 8×6 = 48
        assert_eq!(recommendations[0].stock, "005930");
        assert_eq!(recommendations[0].final_score, 100.0);
        assert_eq!(recommendations[0].grade, SentimentGrade::VeryPositive);

        assert_eq!(recommendations[1].stock, "000660");
        assert_eq!(recommendations[1].final_score, 48.0);
        assert_eq!(recommendations[1].sentiment_index, 0.0);
        assert_eq!(recommendations[1].grade, SentimentGrade::Neutral);
    }

    #[tokio::test]
    async fn test_run_training_sequences_stages() {
        let pipeline = RecommendationPipelineBuilder::new()
            .with_profile(Profile::Development)
            .build();

        let deployment = pipeline
            .run_training(&FixtureTrainer, &FixtureEvaluator, &FixtureDeployer)
            .await
            .unwrap();

        assert_eq!(deployment.model_name, "GraphSAGE");
        assert_eq!(deployment.alias, "Champion");
    }

    #[tokio::test]
    async fn test_run_training_propagates_stage_failure() {
        let pipeline = RecommendationPipelineBuilder::new().build();

        let err = pipeline
            .run_training(&FailingTrainer, &FixtureEvaluator, &FixtureDeployer)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Train(_)));
    }
}
