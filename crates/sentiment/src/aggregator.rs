//! 情感聚合模块
//!
//! 把逐篇新闻的情感标签聚合为每只股票/每个关键词的情感指数，
//! 可选按发布时间做线性衰减加权。所有输入问题（缺失字段、无法解析的
//! 日期、零计数）都退化为中性默认值，不产生错误。

use crate::types::{EntitySentiment, NewsRecord, PubDate, WeightedEntitySentiment};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// 正面标签标记
const POSITIVE_MARKER: &str = "긍정";
/// 负面标签标记
const NEGATIVE_MARKER: &str = "부정";
/// 上游缺失值的字面量表示
const MISSING_MARKER: &str = "nan";
/// 时间权重下限，权重不会衰减到 0
const MIN_TIME_WEIGHT: f64 = 0.3;
/// 默认衰减率，每天 10%
const DEFAULT_DECAY_RATE: f64 = 0.1;

/// 发布时间文本的候选格式，按声明顺序依次尝试
const DATETIME_FORMATS: [&str; 2] = ["%Y/%m/%d %H:%M", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: [&str; 2] = ["%Y/%m/%d", "%Y-%m-%d"];

/// 情感聚合器
#[derive(Debug, Clone)]
pub struct SentimentAggregator {
    decay_rate: f64,
}

impl SentimentAggregator {
    /// 创建聚合器
    ///
    /// `decay_rate` 为时间权重的衰减率（每天减少的比例）
    pub fn new(decay_rate: f64) -> Self {
        Self { decay_rate }
    }

    /// 情感标签转分数
    ///
    /// 含正面标记返回 +1.0，含负面标记返回 -1.0，其余为 0.0。
    /// 先检查正面再检查负面，同时含两种标记的标签按正面处理，
    /// 沿用既有数据口径，刻意保留。
    pub fn score_label(label: &str) -> f64 {
        let label = label.trim();
        if label.contains(POSITIVE_MARKER) {
            1.0
        } else if label.contains(NEGATIVE_MARKER) {
            -1.0
        } else {
            0.0
        }
    }

    /// 情感指数
    ///
    /// 公式: (正面 - 负面) / 总数，总数为 0 时返回 0.0
    pub fn sentiment_index(positive: usize, negative: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        (positive as f64 - negative as f64) / total as f64
    }

    /// 时间权重，以当前时间为基准
    pub fn time_weight(&self, pub_date: &PubDate) -> f64 {
        self.time_weight_at(pub_date, Local::now().naive_local())
    }

    /// 时间权重，以指定时间为基准
    ///
    /// 文本日期按四种固定格式依次解析，全部失败返回 1.0（不衰减）。
    /// 未来日期同样返回 1.0，其余按天数线性衰减，下限 0.3。
    pub fn time_weight_at(&self, pub_date: &PubDate, reference: NaiveDateTime) -> f64 {
        let parsed = match pub_date {
            PubDate::Timestamp(dt) => *dt,
            PubDate::Text(raw) => match parse_pub_date(raw) {
                Some(dt) => dt,
                None => return 1.0,
            },
        };

        let elapsed = reference.signed_duration_since(parsed);
        if elapsed < Duration::zero() {
            return 1.0;
        }

        let days = elapsed.num_days() as f64;
        (1.0 - days * self.decay_rate).max(MIN_TIME_WEIGHT)
    }

    /// 按股票聚合情感指数
    ///
    /// 股票字段缺失的行被跳过。`split_comma` 为真时字段按逗号拆分，
    /// 每只股票各计一次该行的标签；为假时整个字段视为一只股票。
    /// 结果按情感指数降序，指数相同保持首次出现的顺序。
    pub fn aggregate_stocks(&self, rows: &[NewsRecord], split_comma: bool) -> Vec<EntitySentiment> {
        let mut tallies: HashMap<String, EntityTally> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for row in rows {
            let Some(stocks_raw) = field_text(row.related_stocks.as_deref()) else {
                continue;
            };
            let score = Self::score_label(row.stocks_sentiment.as_deref().unwrap_or(""));

            for stock in split_entities(stocks_raw, split_comma) {
                tally_entry(&mut tallies, &mut order, stock).record(score);
            }
        }

        let mut results: Vec<EntitySentiment> = order
            .into_iter()
            .filter_map(|entity| {
                tallies.remove(&entity).map(|tally| tally.into_sentiment(entity))
            })
            .collect();

        results.sort_by(|a, b| b.sentiment_index.total_cmp(&a.sentiment_index));
        tracing::info!("Aggregated sentiment for {} stocks", results.len());
        results
    }

    /// 按关键词聚合情感指数
    ///
    /// 关键词字段与关键词情感字段都按逗号拆分后按位置配对，
    /// 较短一侧之外的条目被丢弃。排序规则与按股票聚合一致。
    pub fn aggregate_keywords(&self, rows: &[NewsRecord]) -> Vec<EntitySentiment> {
        let mut tallies: HashMap<String, EntityTally> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for row in rows {
            let Some(keywords_raw) = field_text(row.keywords.as_deref()) else {
                continue;
            };
            let labels_raw = row.keywords_sentiment.as_deref().unwrap_or("").trim();

            let keywords = keywords_raw.split(',').map(str::trim);
            let labels = labels_raw.split(',').map(str::trim);

            for (keyword, label) in keywords.zip(labels) {
                if keyword.is_empty() {
                    continue;
                }
                tally_entry(&mut tallies, &mut order, keyword).record(Self::score_label(label));
            }
        }

        let mut results: Vec<EntitySentiment> = order
            .into_iter()
            .filter_map(|entity| {
                tallies.remove(&entity).map(|tally| tally.into_sentiment(entity))
            })
            .collect();

        results.sort_by(|a, b| b.sentiment_index.total_cmp(&a.sentiment_index));
        tracing::info!("Aggregated sentiment for {} keywords", results.len());
        results
    }

    /// 按股票聚合时间加权情感指数，以当前时间为基准
    pub fn aggregate_stocks_weighted(
        &self,
        rows: &[NewsRecord],
        split_comma: bool,
    ) -> Vec<WeightedEntitySentiment> {
        self.aggregate_stocks_weighted_at(rows, split_comma, Local::now().naive_local())
    }

    /// 按股票聚合时间加权情感指数，以指定时间为基准
    ///
    /// 每行只计算一次时间权重和情感分数，行内所有股票共享。
    /// 加权指数 = Σ(分数×权重) / Σ权重，权重和为 0 时取 0.0。
    /// 结果按加权指数降序，并列保持首次出现的顺序。
    pub fn aggregate_stocks_weighted_at(
        &self,
        rows: &[NewsRecord],
        split_comma: bool,
        reference: NaiveDateTime,
    ) -> Vec<WeightedEntitySentiment> {
        let mut tallies: HashMap<String, EntityTally> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for row in rows {
            let Some(stocks_raw) = field_text(row.related_stocks.as_deref()) else {
                continue;
            };
            let score = Self::score_label(row.stocks_sentiment.as_deref().unwrap_or(""));
            let weight = row
                .pub_date
                .as_ref()
                .map(|d| self.time_weight_at(d, reference))
                .unwrap_or(1.0);

            for stock in split_entities(stocks_raw, split_comma) {
                let tally = tally_entry(&mut tallies, &mut order, stock);
                tally.record(score);
                tally.weighted_scores.push(score * weight);
                tally.weights.push(weight);
            }
        }

        let mut results: Vec<WeightedEntitySentiment> = order
            .into_iter()
            .filter_map(|entity| {
                tallies.remove(&entity).map(|tally| tally.into_weighted(entity))
            })
            .collect();

        results.sort_by(|a, b| {
            b.weighted_sentiment_index.total_cmp(&a.weighted_sentiment_index)
        });
        tracing::info!("Aggregated weighted sentiment for {} stocks", results.len());
        results
    }
}

impl Default for SentimentAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_DECAY_RATE)
    }
}

/// 最终推荐分数
///
/// 公式: 关键词关联度 × 6.0 + 情感指数 × 40.0。
/// 关联度取值 0~10，情感指数 -1.0~1.0，结果大致落在 [-40, 100]，不做截断。
pub fn recommendation_score(keyword_relevance: f64, sentiment_index: f64) -> f64 {
    keyword_relevance * 6.0 + sentiment_index * 40.0
}

/// 单个实体的聚合中间值，只在一次聚合调用内存在
#[derive(Debug, Default)]
struct EntityTally {
    positive: usize,
    negative: usize,
    neutral: usize,
    total: usize,
    weighted_scores: Vec<f64>,
    weights: Vec<f64>,
}

impl EntityTally {
    fn record(&mut self, score: f64) {
        self.total += 1;
        if score > 0.0 {
            self.positive += 1;
        } else if score < 0.0 {
            self.negative += 1;
        } else {
            self.neutral += 1;
        }
    }

    fn into_sentiment(self, entity: String) -> EntitySentiment {
        let sentiment_index =
            SentimentAggregator::sentiment_index(self.positive, self.negative, self.total);
        EntitySentiment {
            entity,
            total: self.total,
            positive: self.positive,
            negative: self.negative,
            neutral: self.neutral,
            sentiment_index,
        }
    }

    fn into_weighted(self, entity: String) -> WeightedEntitySentiment {
        let sentiment_index =
            SentimentAggregator::sentiment_index(self.positive, self.negative, self.total);

        let weight_sum: f64 = self.weights.iter().sum();
        let weighted_sentiment_index = if weight_sum > 0.0 {
            self.weighted_scores.iter().sum::<f64>() / weight_sum
        } else {
            0.0
        };
        let avg_weight = if self.weights.is_empty() {
            0.0
        } else {
            weight_sum / self.weights.len() as f64
        };

        WeightedEntitySentiment {
            entity,
            total: self.total,
            positive: self.positive,
            negative: self.negative,
            neutral: self.neutral,
            sentiment_index,
            weighted_sentiment_index,
            avg_weight,
        }
    }
}

/// 取出首次出现即登记顺序的聚合槽位
fn tally_entry<'a>(
    tallies: &'a mut HashMap<String, EntityTally>,
    order: &mut Vec<String>,
    entity: &str,
) -> &'a mut EntityTally {
    match tallies.entry(entity.to_string()) {
        Entry::Occupied(slot) => slot.into_mut(),
        Entry::Vacant(slot) => {
            order.push(entity.to_string());
            slot.insert(EntityTally::default())
        }
    }
}

/// 规整字段文本，空串与 "nan" 视为缺失
fn field_text(field: Option<&str>) -> Option<&str> {
    let text = field?.trim();
    if text.is_empty() || text == MISSING_MARKER {
        None
    } else {
        Some(text)
    }
}

/// 拆分实体字段，过滤掉拆分后的空片段
fn split_entities(raw: &str, split_comma: bool) -> Vec<&str> {
    if split_comma {
        raw.split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .collect()
    } else {
        vec![raw]
    }
}

/// 解析发布时间文本，四种格式依次尝试
fn parse_pub_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }
    None
}
