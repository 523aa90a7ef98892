//! Analytics aggregation
//!
//! Turns the raw stored answers for one question (or one campaign) into
//! distributions, numeric statistics, and lightweight text analysis. All
//! computations are pure, synchronous, and recomputed on each query;
//! nothing here is persisted.
//!
//! Malformed individual answers never fail an aggregation: unparsable
//! numerics and blank texts are dropped silently so one bad answer cannot
//! block visibility into the rest of a campaign's data.

use crate::model::{Campaign, CampaignStatus, QuestionType, Response};
use crate::value::{as_number, display_string};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Number of histogram buckets for numeric questions
const HISTOGRAM_BUCKETS: usize = 10;

/// Number of top terms reported for text questions
const TOP_TERMS: usize = 15;

/// Fixed English stopword list for term frequency analysis.
/// Read-only process-wide table; never mutated at runtime.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can",
        "do", "for", "from", "had", "has", "have", "he", "her", "his", "i",
        "if", "in", "into", "is", "it", "its", "just", "me", "my", "no",
        "not", "of", "on", "or", "our", "she", "so", "some", "than", "that",
        "the", "their", "them", "then", "there", "they", "this", "to", "too",
        "very", "was", "we", "were", "what", "when", "which", "who", "will",
        "with", "would", "you", "your",
    ]
    .into_iter()
    .collect()
});

/// Positive sentiment lexicon (substring matched, not token-bounded)
static POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "awesome", "fantastic",
    "wonderful", "love", "happy", "satisfied", "helpful", "best", "perfect",
    "easy",
];

/// Negative sentiment lexicon (substring matched, not token-bounded)
static NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "hate", "poor", "disappointed",
    "worst", "slow", "broken", "frustrating", "useless", "confusing", "hard",
];

/// One counted choice value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceCount {
    pub key: String,
    pub count: u64,
}

/// One histogram bucket: `[start, end)`, except the last bucket which is
/// closed at `max` to absorb floating-point drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub start: f64,
    pub end: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentTally {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

/// Per-question analytics result, discriminated by question type.
/// Callers dispatch on the `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QuestionAnalytics {
    #[serde(rename = "choice")]
    Choice { distribution: Vec<ChoiceCount> },
    #[serde(rename = "numeric", rename_all = "camelCase")]
    Numeric {
        count: u64,
        average: f64,
        median: f64,
        min: f64,
        max: f64,
        histogram: Vec<HistogramBucket>,
    },
    #[serde(rename = "text", rename_all = "camelCase")]
    Text {
        total_texts: u64,
        top_words: Vec<WordCount>,
        sentiment: SentimentTally,
    },
    #[serde(rename = "raw")]
    Raw { answers: Vec<Value> },
}

/// Campaign-level metrics (separate from per-question analytics)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignMetrics {
    pub campaign_id: Uuid,
    pub campaign_name: String,
    pub total_responses: u64,
    pub completed_responses: u64,
    pub completion_rate: f64,
    pub average_completion_time: f64,
    pub authenticated_responses: u64,
    pub anonymous_responses: u64,
    pub status: CampaignStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Aggregate the answer values stored for one question.
///
/// Choice questions get a value distribution, numeric/scale questions get
/// summary statistics with a fixed 10-bucket histogram, free text gets term
/// frequency plus a lexicon sentiment tally, and everything else (file
/// uploads) falls back to the raw answer list.
pub fn aggregate_question(question_type: QuestionType, values: &[Value]) -> QuestionAnalytics {
    match question_type {
        QuestionType::MultipleChoice | QuestionType::Checkbox => QuestionAnalytics::Choice {
            distribution: choice_distribution(values),
        },
        QuestionType::Number | QuestionType::Scale => numeric_summary(values),
        QuestionType::Text => text_summary(values),
        QuestionType::FileUpload => QuestionAnalytics::Raw {
            answers: values.to_vec(),
        },
    }
}

/// Count answers keyed by their JSON serialization, in first-encountered
/// order. Array-valued (multi-choice) answers contribute one count per
/// element. No normalization beyond stringification: the number `1` and the
/// string `"1"` serialize differently and are counted separately.
pub fn choice_distribution(values: &[Value]) -> Vec<ChoiceCount> {
    let mut counts: Vec<ChoiceCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let bump = |counts: &mut Vec<ChoiceCount>, index: &mut HashMap<String, usize>, v: &Value| {
        let key = v.to_string();
        match index.get(&key) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push(ChoiceCount { key, count: 1 });
            }
        }
    };

    for value in values {
        match value {
            Value::Array(items) => {
                for item in items {
                    bump(&mut counts, &mut index, item);
                }
            }
            other => bump(&mut counts, &mut index, other),
        }
    }

    counts
}

/// Numeric summary with a fixed 10-bucket histogram.
///
/// Values not convertible to a number are dropped silently. An empty
/// filtered set yields zeroes and no buckets.
pub fn numeric_summary(values: &[Value]) -> QuestionAnalytics {
    let numbers: Vec<f64> = values.iter().filter_map(as_number).collect();

    if numbers.is_empty() {
        return QuestionAnalytics::Numeric {
            count: 0,
            average: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
            histogram: Vec::new(),
        };
    }

    let count = numbers.len();
    let sum: f64 = numbers.iter().sum();
    let average = sum / count as f64;

    let mut sorted = numbers.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    let min = sorted[0];
    let max = sorted[count - 1];

    // Degenerate all-identical case: width 1, everything in bucket 0
    let width = if max == min {
        1.0
    } else {
        (max - min) / HISTOGRAM_BUCKETS as f64
    };

    let mut histogram: Vec<HistogramBucket> = (0..HISTOGRAM_BUCKETS)
        .map(|i| {
            let start = min + i as f64 * width;
            let end = if i == HISTOGRAM_BUCKETS - 1 {
                // Last bucket closes at max to absorb floating-point drift
                max
            } else {
                start + width
            };
            HistogramBucket {
                start,
                end,
                count: 0,
            }
        })
        .collect();

    for value in &numbers {
        let index = ((value - min) / width).floor() as i64;
        let index = index.clamp(0, HISTOGRAM_BUCKETS as i64 - 1) as usize;
        histogram[index].count += 1;
    }

    QuestionAnalytics::Numeric {
        count: count as u64,
        average,
        median,
        min,
        max,
        histogram,
    }
}

/// Term frequency and lexicon sentiment over free-text answers.
pub fn text_summary(values: &[Value]) -> QuestionAnalytics {
    let texts: Vec<String> = values
        .iter()
        .filter(|v| !v.is_null())
        .map(display_string)
        .filter(|s| !s.trim().is_empty())
        .collect();

    // Term frequency, insertion-ordered so ties keep first-encountered order
    let mut words: Vec<WordCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for text in &texts {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
            .collect();

        for term in normalized.split_whitespace() {
            if STOPWORDS.contains(term) {
                continue;
            }
            match index.get(term) {
                Some(&i) => words[i].count += 1,
                None => {
                    index.insert(term.to_string(), words.len());
                    words.push(WordCount {
                        word: term.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    // Stable sort: equal counts preserve first-encountered order
    words.sort_by(|a, b| b.count.cmp(&a.count));
    words.truncate(TOP_TERMS);

    let mut positive: u64 = 0;
    let mut negative: u64 = 0;

    for text in &texts {
        let lower = text.to_lowercase();
        for word in POSITIVE_WORDS {
            if lower.contains(word) {
                positive += 1;
            }
        }
        for word in NEGATIVE_WORDS {
            if lower.contains(word) {
                negative += 1;
            }
        }
    }

    // Keyword hits, not per-text classifications: a single text with several
    // lexicon hits shifts neutral below the untagged-text count.
    let total = texts.len() as u64;
    let neutral = (total as i64 - positive as i64 - negative as i64).max(0) as u64;

    QuestionAnalytics::Text {
        total_texts: total,
        top_words: words,
        sentiment: SentimentTally {
            positive,
            negative,
            neutral,
        },
    }
}

/// Campaign-level response metrics
pub fn campaign_metrics(campaign: &Campaign, responses: &[Response]) -> CampaignMetrics {
    let total = responses.len() as u64;
    let completed = responses.iter().filter(|r| r.completed_at.is_some()).count() as u64;

    let completion_rate = if total > 0 {
        round2(completed as f64 / total as f64 * 100.0)
    } else {
        0.0
    };

    let times: Vec<i64> = responses
        .iter()
        .filter_map(|r| r.completion_time_seconds)
        .collect();
    let average_completion_time = if times.is_empty() {
        0.0
    } else {
        round2(times.iter().sum::<i64>() as f64 / times.len() as f64)
    };

    let authenticated = responses.iter().filter(|r| r.user_id.is_some()).count() as u64;

    CampaignMetrics {
        campaign_id: campaign.id,
        campaign_name: campaign.name.clone(),
        total_responses: total,
        completed_responses: completed,
        completion_rate,
        average_completion_time,
        authenticated_responses: authenticated,
        anonymous_responses: total - authenticated,
        status: campaign.status,
        start_date: campaign.start_date,
        end_date: campaign.end_date,
    }
}

/// Round to 2 decimal places
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ------------------------------------------------------------------
    // Choice distributions
    // ------------------------------------------------------------------

    #[test]
    fn test_choice_distribution_counts_scalars() {
        let values = vec![json!("red"), json!("blue"), json!("red")];
        let dist = choice_distribution(&values);

        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0], ChoiceCount { key: "\"red\"".to_string(), count: 2 });
        assert_eq!(dist[1], ChoiceCount { key: "\"blue\"".to_string(), count: 1 });
    }

    #[test]
    fn test_choice_distribution_expands_arrays() {
        let values = vec![json!(["a", "b"]), json!(["b"])];
        let dist = choice_distribution(&values);

        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].count, 1); // "a"
        assert_eq!(dist[1].count, 2); // "b"
    }

    #[test]
    fn test_choice_distribution_keeps_types_distinct() {
        // The number 1 and the string "1" are counted separately
        let values = vec![json!(1), json!("1"), json!(1)];
        let dist = choice_distribution(&values);

        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0], ChoiceCount { key: "1".to_string(), count: 2 });
        assert_eq!(dist[1], ChoiceCount { key: "\"1\"".to_string(), count: 1 });
    }

    // ------------------------------------------------------------------
    // Numeric summaries
    // ------------------------------------------------------------------

    #[test]
    fn test_numeric_summary_one_through_ten() {
        let values: Vec<Value> = (1..=10).map(|n| json!(n)).collect();
        let QuestionAnalytics::Numeric {
            count,
            average,
            median,
            min,
            max,
            histogram,
        } = numeric_summary(&values)
        else {
            panic!("expected numeric analytics");
        };

        assert_eq!(count, 10);
        assert!((average - 5.5).abs() < 1e-9);
        assert!((median - 5.5).abs() < 1e-9);
        assert_eq!(min, 1.0);
        assert_eq!(max, 10.0);

        assert_eq!(histogram.len(), 10);
        for bucket in &histogram {
            assert!((bucket.end - bucket.start - 0.9).abs() < 1e-9 || bucket.end == 10.0);
            // Each bucket holds exactly one value; 10 lands in bucket 9
            assert_eq!(bucket.count, 1);
        }
        assert_eq!(histogram[9].end, 10.0);
    }

    #[test]
    fn test_numeric_summary_degenerate_identical_values() {
        let values = vec![json!(5), json!(5), json!(5)];
        let QuestionAnalytics::Numeric {
            count,
            min,
            max,
            histogram,
            ..
        } = numeric_summary(&values)
        else {
            panic!("expected numeric analytics");
        };

        assert_eq!(count, 3);
        assert_eq!(min, 5.0);
        assert_eq!(max, 5.0);
        assert_eq!(histogram[0].count, 3);
        assert!(histogram[1..].iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_numeric_summary_even_count_median() {
        let values = vec![json!(1), json!(2), json!(3), json!(4)];
        let QuestionAnalytics::Numeric { median, .. } = numeric_summary(&values) else {
            panic!("expected numeric analytics");
        };
        assert!((median - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_numeric_summary_drops_unparsable_values() {
        let values = vec![json!(2), json!("4"), json!("n/a"), Value::Null, json!(true)];
        let QuestionAnalytics::Numeric { count, average, .. } = numeric_summary(&values) else {
            panic!("expected numeric analytics");
        };
        assert_eq!(count, 2);
        assert!((average - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_numeric_summary_empty_input() {
        let QuestionAnalytics::Numeric {
            count,
            average,
            median,
            min,
            max,
            histogram,
        } = numeric_summary(&[])
        else {
            panic!("expected numeric analytics");
        };
        assert_eq!(count, 0);
        assert_eq!(average, 0.0);
        assert_eq!(median, 0.0);
        assert_eq!(min, 0.0);
        assert_eq!(max, 0.0);
        assert!(histogram.is_empty());
    }

    // ------------------------------------------------------------------
    // Text summaries
    // ------------------------------------------------------------------

    #[test]
    fn test_text_summary_sentiment_tally() {
        let values = vec![json!("This is good"), json!("This is bad and terrible")];
        let QuestionAnalytics::Text {
            total_texts,
            top_words,
            sentiment,
        } = text_summary(&values)
        else {
            panic!("expected text analytics");
        };

        assert_eq!(total_texts, 2);
        assert_eq!(sentiment.positive, 1);
        // One text matches both "bad" and "terrible": two keyword hits
        assert_eq!(sentiment.negative, 2);
        assert_eq!(sentiment.neutral, 0);

        let words: Vec<&str> = top_words.iter().map(|w| w.word.as_str()).collect();
        assert!(words.contains(&"good"));
        assert!(words.contains(&"bad"));
        assert!(!words.contains(&"this"));
        assert!(!words.contains(&"is"));
        assert!(!words.contains(&"and"));
    }

    #[test]
    fn test_text_summary_neutral_never_negative() {
        // Several lexicon hits in one text push positive+negative past the
        // text count; neutral clamps at zero instead of underflowing.
        let values = vec![json!("good great excellent bad")];
        let QuestionAnalytics::Text { sentiment, .. } = text_summary(&values) else {
            panic!("expected text analytics");
        };
        assert_eq!(sentiment.positive, 3);
        assert_eq!(sentiment.negative, 1);
        assert_eq!(sentiment.neutral, 0);
    }

    #[test]
    fn test_text_summary_tie_break_keeps_first_encountered_order() {
        let values = vec![json!("zebra apple zebra apple kiwi")];
        let QuestionAnalytics::Text { top_words, .. } = text_summary(&values) else {
            panic!("expected text analytics");
        };

        assert_eq!(top_words[0].word, "zebra");
        assert_eq!(top_words[1].word, "apple");
        assert_eq!(top_words[2].word, "kiwi");
    }

    #[test]
    fn test_text_summary_strips_punctuation_and_blanks() {
        let values = vec![json!("Great!!! Really great."), json!("   "), Value::Null, json!(42)];
        let QuestionAnalytics::Text {
            total_texts,
            top_words,
            ..
        } = text_summary(&values)
        else {
            panic!("expected text analytics");
        };

        // Blank and null dropped, number coerced to its string form
        assert_eq!(total_texts, 2);
        assert_eq!(top_words[0], WordCount { word: "great".to_string(), count: 2 });
        assert!(top_words.iter().any(|w| w.word == "42"));
    }

    #[test]
    fn test_text_summary_caps_top_words_at_fifteen() {
        let text = (0..20).map(|i| format!("word{}", i)).collect::<Vec<_>>().join(" ");
        let QuestionAnalytics::Text { top_words, .. } = text_summary(&[json!(text)]) else {
            panic!("expected text analytics");
        };
        assert_eq!(top_words.len(), 15);
    }

    // ------------------------------------------------------------------
    // Type dispatch and campaign metrics
    // ------------------------------------------------------------------

    #[test]
    fn test_file_upload_falls_back_to_raw() {
        let values = vec![json!({"fileName": "a.pdf"})];
        let result = aggregate_question(QuestionType::FileUpload, &values);
        assert_eq!(result, QuestionAnalytics::Raw { answers: values });
    }

    #[test]
    fn test_scale_uses_numeric_aggregation() {
        let result = aggregate_question(QuestionType::Scale, &[json!(3), json!(4)]);
        assert!(matches!(result, QuestionAnalytics::Numeric { count: 2, .. }));
    }

    #[test]
    fn test_analytics_serialization_carries_type_tag() {
        let result = aggregate_question(QuestionType::MultipleChoice, &[json!("a")]);
        let encoded = serde_json::to_value(&result).unwrap();
        assert_eq!(encoded["type"], "choice");
        assert_eq!(encoded["distribution"][0]["count"], 1);
    }

    fn campaign() -> Campaign {
        Campaign {
            id: Uuid::new_v4(),
            name: "Launch survey".to_string(),
            description: None,
            start_date: Utc::now(),
            end_date: Utc::now(),
            status: CampaignStatus::Published,
            survey_version_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn response(user: bool, completed: bool, seconds: Option<i64>) -> Response {
        Response {
            id: Uuid::new_v4(),
            campaign_id: Uuid::new_v4(),
            user_id: user.then(Uuid::new_v4),
            anonymous_id: (!user).then(|| "anon-1".to_string()),
            started_at: Utc::now(),
            completed_at: completed.then(Utc::now),
            completion_time_seconds: seconds,
            created_at: Utc::now(),
            items: vec![],
        }
    }

    #[test]
    fn test_campaign_metrics() {
        let responses = vec![
            response(true, true, Some(30)),
            response(true, true, Some(45)),
            response(false, false, None),
        ];
        let metrics = campaign_metrics(&campaign(), &responses);

        assert_eq!(metrics.total_responses, 3);
        assert_eq!(metrics.completed_responses, 2);
        assert_eq!(metrics.completion_rate, 66.67);
        assert_eq!(metrics.average_completion_time, 37.5);
        assert_eq!(metrics.authenticated_responses, 2);
        assert_eq!(metrics.anonymous_responses, 1);
    }

    #[test]
    fn test_campaign_metrics_no_responses() {
        let metrics = campaign_metrics(&campaign(), &[]);
        assert_eq!(metrics.total_responses, 0);
        assert_eq!(metrics.completion_rate, 0.0);
        assert_eq!(metrics.average_completion_time, 0.0);
    }
}
