//! 排名报表
//!
//! 把聚合结果渲染成人类可读的排名文本，纯展示用途，由调用方打印或写日志。

use crate::types::{EntitySentiment, WeightedEntitySentiment};
use std::fmt::Write;

/// 指数高于该阈值标绿、低于负阈值标红，其余标黄
const BAND_THRESHOLD: f64 = 0.3;

fn band_marker(index: f64) -> &'static str {
    if index > BAND_THRESHOLD {
        "🟢"
    } else if index < -BAND_THRESHOLD {
        "🔴"
    } else {
        "🟡"
    }
}

/// 渲染情感指数排名
pub fn render_ranking(title: &str, results: &[EntitySentiment]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(90));
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(90));

    for (rank, r) in results.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} {:<20} | 情感指数: {:+.3} | 正面: {}  负面: {}  总计: {}",
            rank + 1,
            band_marker(r.sentiment_index),
            r.entity,
            r.sentiment_index,
            r.positive,
            r.negative,
            r.total
        );
    }

    out
}

/// 渲染时间加权的情感指数排名
pub fn render_weighted_ranking(title: &str, results: &[WeightedEntitySentiment]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(90));
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(90));

    for (rank, r) in results.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} {:<20} | 加权指数: {:+.3} | 普通指数: {:+.3} | 平均权重: {:.2} | 总计: {}",
            rank + 1,
            band_marker(r.weighted_sentiment_index),
            r.entity,
            r.weighted_sentiment_index,
            r.sentiment_index,
            r.avg_weight,
            r.total
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_ranking() {
        let results = vec![
            EntitySentiment {
                entity: "000660".to_string(),
                total: 1,
                positive: 1,
                negative: 0,
                neutral: 0,
                sentiment_index: 1.0,
            },
            EntitySentiment {
                entity: "005930".to_string(),
                total: 2,
                positive: 1,
                negative: 1,
                neutral: 0,
                sentiment_index: 0.0,
            },
        ];

        let text = render_ranking("股票情感指数", &results);
        println!("{}", text);

        assert!(text.contains("1. 🟢 000660"));
        assert!(text.contains("2. 🟡 005930"));
        assert!(text.contains("+1.000"));
    }
}
