//! 核心类型定义

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 新闻记录
///
/// 上游爬虫产出的一行数据。股票与关键词字段均为逗号分隔的字符串，
/// 缺失字段用 `None` 表示（上游也可能写入字面量 `"nan"`，聚合时同样视为缺失）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsRecord {
    /// 标题
    pub title: Option<String>,
    /// 相关股票代码，逗号分隔
    pub related_stocks: Option<String>,
    /// 股票情感标签，整行一个标签，适用于该行的所有股票
    pub stocks_sentiment: Option<String>,
    /// 关键词，逗号分隔
    pub keywords: Option<String>,
    /// 关键词情感标签，逗号分隔，与关键词按位置配对
    pub keywords_sentiment: Option<String>,
    /// 发布时间
    pub pub_date: Option<PubDate>,
}

/// 发布时间
///
/// 上游可能给出原生时间值，也可能给出未解析的文本。
/// 文本按四种固定格式依次尝试解析，全部失败时按"无衰减"处理。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PubDate {
    Timestamp(NaiveDateTime),
    Text(String),
}

impl From<NaiveDateTime> for PubDate {
    fn from(value: NaiveDateTime) -> Self {
        PubDate::Timestamp(value)
    }
}

impl From<&str> for PubDate {
    fn from(value: &str) -> Self {
        PubDate::Text(value.to_string())
    }
}

/// 单个实体（股票或关键词）的情感聚合结果
///
/// 不变量: `positive + negative + neutral == total`，且 `total >= 1`
/// （没有出现过的实体不会产生结果）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySentiment {
    /// 实体标识（股票代码或关键词）
    pub entity: String,
    /// 出现总次数
    pub total: usize,
    /// 正面次数
    pub positive: usize,
    /// 负面次数
    pub negative: usize,
    /// 中性次数
    pub neutral: usize,
    /// 情感指数 [-1.0, 1.0]，(正面 - 负面) / 总数
    pub sentiment_index: f64,
}

/// 带时间加权的情感聚合结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedEntitySentiment {
    pub entity: String,
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    /// 普通情感指数
    pub sentiment_index: f64,
    /// 加权情感指数，Σ(分数×权重) / Σ权重
    pub weighted_sentiment_index: f64,
    /// 平均时间权重 [0.3, 1.0]
    pub avg_weight: f64,
}

/// 情感等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentGrade {
    VeryPositive, // 0.5 ~ 1.0
    Positive,     // 0.2 ~ 0.5
    Neutral,      // -0.2 ~ 0.2
    Negative,     // -0.5 ~ -0.2
    VeryNegative, // -1.0 ~ -0.5
}

impl SentimentGrade {
    /// 从情感指数转换为等级，自上而下取第一个命中的区间
    pub fn from_index(index: f64) -> Self {
        match index {
            i if i > 0.5 => SentimentGrade::VeryPositive,
            i if i > 0.2 => SentimentGrade::Positive,
            i if i > -0.2 => SentimentGrade::Neutral,
            i if i > -0.5 => SentimentGrade::Negative,
            _ => SentimentGrade::VeryNegative,
        }
    }
}

impl std::fmt::Display for SentimentGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentGrade::VeryPositive => write!(f, "very positive"),
            SentimentGrade::Positive => write!(f, "positive"),
            SentimentGrade::Neutral => write!(f, "neutral"),
            SentimentGrade::Negative => write!(f, "negative"),
            SentimentGrade::VeryNegative => write!(f, "very negative"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_bands() {
        assert_eq!(SentimentGrade::from_index(0.8), SentimentGrade::VeryPositive);
        assert_eq!(SentimentGrade::from_index(0.5), SentimentGrade::Positive);
        assert_eq!(SentimentGrade::from_index(0.2), SentimentGrade::Neutral);
        assert_eq!(SentimentGrade::from_index(0.0), SentimentGrade::Neutral);
        assert_eq!(SentimentGrade::from_index(-0.2), SentimentGrade::Negative);
        assert_eq!(SentimentGrade::from_index(-0.5), SentimentGrade::VeryNegative);
        assert_eq!(SentimentGrade::from_index(-1.0), SentimentGrade::VeryNegative);
    }

    #[test]
    fn test_grade_display() {
        assert_eq!(SentimentGrade::VeryPositive.to_string(), "very positive");
        assert_eq!(SentimentGrade::VeryNegative.to_string(), "very negative");
    }

    #[test]
    fn test_pub_date_from_text() {
        let date = PubDate::from("2025/01/08 09:30");
        assert_eq!(date, PubDate::Text("2025/01/08 09:30".to_string()));
    }
}
