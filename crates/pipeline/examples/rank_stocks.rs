//! 推荐流水线示例
//!
//! 展示如何把带情感标签的新闻记录聚合成股票/关键词排名与最终推荐

use async_trait::async_trait;
use pipeline::{
    CrawlStage, PipelineResult, Profile, RecommendationPipelineBuilder, StockCandidate,
};
use sentiment::{report, NewsRecord};

/// 演示用爬虫，返回内存中的样例记录
struct SampleCrawler;

#[async_trait]
impl CrawlStage for SampleCrawler {
    async fn crawl(&self, _limit: usize) -> PipelineResult<Vec<NewsRecord>> {
        Ok(sample_records())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== 股票推荐流水线示例 ===\n");

    // 1. 创建流水线
    println!("1. 创建流水线...");
    let pipeline = RecommendationPipelineBuilder::new()
        .with_profile(Profile::Development)
        .with_decay_rate(0.1)
        .build();

    println!("   环境: {}", pipeline.config().profile);
    println!("   产出表: {}\n", pipeline.config().meta.recommendation_table);

    // 2. 爬取并排名
    println!("2. 爬取新闻并按股票聚合...");
    let ranked = pipeline.crawl_and_rank(&SampleCrawler, 50).await?;
    println!("{}", report::render_ranking("股票情感指数", &ranked));

    // 3. 关键词排名
    println!("3. 按关键词聚合...");
    let rows = sample_records();
    let keywords = pipeline.rank_keywords(&rows);
    println!("{}", report::render_ranking("关键词情感指数", &keywords));

    // 4. 时间加权排名
    println!("4. 按发布时间加权...");
    let weighted = pipeline.rank_stocks_weighted(&rows);
    println!("{}", report::render_weighted_ranking("加权股票情感指数", &weighted));

    // 5. 合成最终推荐
    println!("5. 合成最终推荐...");
    let candidates = vec![
        StockCandidate {
            stock: "005930".to_string(),
            keyword_relevance: 9.0,
        },
        StockCandidate {
            stock: "000660".to_string(),
            keyword_relevance: 7.5,
        },
        StockCandidate {
            stock: "035720".to_string(),
            keyword_relevance: 6.0,
        },
    ];

    for (rank, rec) in pipeline.recommend(&rows, &candidates).iter().enumerate() {
        println!(
            "   {}. {:<10} | 最终分数: {:>6.1} | 情感指数: {:+.3} | {}",
            rank + 1,
            rec.stock,
            rec.final_score,
            rec.sentiment_index,
            rec.grade
        );
    }

    println!("\n=== 示例完成 ===");
    Ok(())
}

fn sample_records() -> Vec<NewsRecord> {
    vec![
        NewsRecord {
            title: Some("삼성전자, 반도체 수출 호조".to_string()),
            related_stocks: Some("005930,000660".to_string()),
            stocks_sentiment: Some("긍정".to_string()),
            keywords: Some("반도체,수출".to_string()),
            keywords_sentiment: Some("긍정,긍정".to_string()),
            pub_date: Some("2025/01/08 09:00".into()),
        },
        NewsRecord {
            title: Some("삼성전자, 파운드리 적자 지속".to_string()),
            related_stocks: Some("005930".to_string()),
            stocks_sentiment: Some("부정".to_string()),
            keywords: Some("파운드리,적자".to_string()),
            keywords_sentiment: Some("중립,부정".to_string()),
            pub_date: Some("2025/01/02".into()),
        },
        NewsRecord {
            title: Some("카카오, 신규 서비스 출시".to_string()),
            related_stocks: Some("035720".to_string()),
            stocks_sentiment: Some("긍정".to_string()),
            keywords: Some("플랫폼".to_string()),
            keywords_sentiment: Some("긍정".to_string()),
            pub_date: Some("2025-01-07 15:30".into()),
        },
    ]
}
