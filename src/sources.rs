use crate::types::{FetchKind, SourceSpec};

pub const HF_BLOG_RSS: &str = "https://huggingface.co/blog/feed.xml";
pub const ARXIV_CS_AI_RSS: &str = "https://export.arxiv.org/rss/cs.AI";
pub const LOCAL_LLAMA_RSS: &str = "https://www.reddit.com/r/LocalLLaMA/.rss";
pub const MACHINE_LEARNING_RSS: &str = "https://www.reddit.com/r/MachineLearning/.rss";
pub const HN_ALGOLIA_SEARCH: &str =
    "https://hn.algolia.com/api/v1/search?query=llm&tags=story&hitsPerPage=30";
pub const HN_ITEM_URL_BASE: &str = "https://news.ycombinator.com/item?id=";

/// Built-in keyword list for AI/LLM signals.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "llm",
    "gpt",
    "model",
    "ai",
    "transformer",
    "clip",
    "embedding",
    "rag",
    "fine-tun",
    "agent",
    "eval",
    "benchmark",
];

pub fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|kw| kw.to_string()).collect()
}

impl SourceSpec {
    pub fn feed(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            kind: FetchKind::Feed,
        }
    }

    pub fn search_api(name: &str, url: &str, item_url_base: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            kind: FetchKind::SearchApi {
                item_url_base: item_url_base.to_string(),
            },
        }
    }

    pub fn hugging_face_blog() -> Self {
        Self::feed("Hugging Face — Blog", HF_BLOG_RSS)
    }

    pub fn arxiv_cs_ai() -> Self {
        // The arXiv rss export sometimes has no entries on weekends (skipDays).
        Self::feed("arXiv — cs.AI", ARXIV_CS_AI_RSS)
    }

    pub fn reddit_local_llama() -> Self {
        Self::feed("Reddit — r/LocalLLaMA", LOCAL_LLAMA_RSS)
    }

    pub fn reddit_machine_learning() -> Self {
        Self::feed("Reddit — r/MachineLearning", MACHINE_LEARNING_RSS)
    }

    pub fn hacker_news() -> Self {
        Self::search_api("Hacker News", HN_ALGOLIA_SEARCH, HN_ITEM_URL_BASE)
    }
}

/// The default source catalog, in display order.
pub fn default_sources() -> Vec<SourceSpec> {
    vec![
        SourceSpec::hugging_face_blog(),
        SourceSpec::arxiv_cs_ai(),
        SourceSpec::reddit_local_llama(),
        SourceSpec::reddit_machine_learning(),
        SourceSpec::hacker_news(),
    ]
}
