//! # Sentiment - 股票情感指数计算
//!
//! 将逐篇新闻的情感标签聚合为股票/关键词级别的情感指数
//!
//! ## 功能
//!
//! - 按股票代码聚合情感标签并排名
//! - 按关键词聚合情感标签（关键词与标签按位置配对）
//! - 按发布时间衰减加权的情感指数
//! - 情感指数分级与最终推荐分数
//! - 排名结果的文本报表

pub mod aggregator;
pub mod report;
pub mod types;

pub use aggregator::{recommendation_score, SentimentAggregator};
pub use types::{
    EntitySentiment, NewsRecord, PubDate, SentimentGrade, WeightedEntitySentiment,
};
