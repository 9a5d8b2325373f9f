//! Maps a chat message onto a closed command set before anything runs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::catalog::Difficulty;

pub const DEFAULT_CODE_LANGUAGE: &str = "java";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    RandomLookup {
        #[serde(skip_serializing_if = "Option::is_none")]
        difficulty: Option<Difficulty>,
    },
    TitleLookup {
        keyword: String,
    },
    IdLookup {
        id: u64,
    },
    RunCode {
        language: String,
        code: String,
    },
    SearchExperiences {
        query: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        company: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        department: Option<String>,
    },
}

impl Command {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RandomLookup { .. } => "random_lookup",
            Self::TitleLookup { .. } => "title_lookup",
            Self::IdLookup { .. } => "id_lookup",
            Self::RunCode { .. } => "run_code",
            Self::SearchExperiences { .. } => "search_experiences",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Command(Command),
    /// Free conversation, answered by the text producer.
    Conversation,
}

static CODE_FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[ \t]*([A-Za-z0-9_+#-]*)[^\n]*\n(.*?)```").expect("code fence regex")
});

static RUN_VERB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)运行|跑一下|执行|\brun\b").expect("run verb regex"));

static ORDINAL_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"第\s*(\d+)\s*[题道]").expect("ordinal id regex"));

static EXPLICIT_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z])id\s*(?:为|是|[:：=])?\s*(\d+)").expect("explicit id regex")
});

static ASK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(给|来|推荐).*(算法题|一道题|题目)").expect("ask regex"));

static ONE_PROBLEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(一道|来道).*题").expect("one problem regex"));

static DIFFICULTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(简单|中等|困难|easy|medium|hard)\s*(?:难度|级别|程度)?\s*的?")
        .expect("difficulty regex")
});

static LEADING_REQUEST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:请|麻烦|帮我)?\s*(?:给我|给|来|推荐|查询|搜索|查找|找|查)?\s*(?:一下)?\s*(?:一道|一个|一题|道|个)?\s*",
    )
    .expect("leading request regex")
});

static TRAILING_REQUEST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*(?:这道|那道|这个)?\s*的?\s*(?:算法题|题目|题)?\s*[吧呢呀啊]?\s*[。.!！?？~]*$")
        .expect("trailing request regex")
});

static EXPERIENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"面经|面试题|八股").expect("experience regex"));

static COMPANY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"字节跳动|字节|阿里巴巴|阿里|腾讯|美团|百度|京东|快手|拼多多|华为|小米|网易|滴滴|蚂蚁")
        .expect("company regex")
});

static DEPARTMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"后端|前端|客户端|算法|测试|运维|数据|产品").expect("department regex")
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Classifies one user message. Rules apply in order; the first hit wins.
#[must_use]
pub fn classify(message: &str) -> Intent {
    let message = message.trim();
    if message.is_empty() {
        return Intent::Conversation;
    }

    if let Some(command) = run_code(message) {
        return Intent::Command(command);
    }
    if let Some(id) = explicit_id(message) {
        return Intent::Command(Command::IdLookup { id });
    }

    let flat = WHITESPACE_RE.replace_all(message, " ");
    if is_algorithm_request(&flat) {
        return Intent::Command(algorithm_command(&flat));
    }

    if EXPERIENCE_RE.is_match(message) {
        return Intent::Command(Command::SearchExperiences {
            query: message.to_string(),
            company: COMPANY_RE.find(message).map(|m| m.as_str().to_string()),
            department: DEPARTMENT_RE.find(message).map(|m| m.as_str().to_string()),
        });
    }

    Intent::Conversation
}

fn run_code(message: &str) -> Option<Command> {
    let captures = CODE_FENCE_RE.captures(message)?;
    let fence_start = captures.get(0).map_or(0, |m| m.start());
    let fence_end = captures.get(0).map_or(0, |m| m.end());
    let outside = format!("{}{}", &message[..fence_start], &message[fence_end..]);
    if !RUN_VERB_RE.is_match(&outside) {
        return None;
    }

    let code = captures.get(2).map_or("", |m| m.as_str()).trim_end().to_string();
    if code.trim().is_empty() {
        return None;
    }
    let language = captures
        .get(1)
        .map(|m| m.as_str().trim().to_ascii_lowercase())
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| DEFAULT_CODE_LANGUAGE.to_string());
    Some(Command::RunCode { language, code })
}

fn explicit_id(message: &str) -> Option<u64> {
    ORDINAL_ID_RE
        .captures(message)
        .or_else(|| EXPLICIT_ID_RE.captures(message))
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn is_algorithm_request(message: &str) -> bool {
    let short = message.chars().count() <= 25;
    (short && (message.contains("算法题") || message.contains("一道题")))
        || ASK_RE.is_match(message)
        || ONE_PROBLEM_RE.is_match(message)
        || message.contains("算法题")
}

fn is_generic_ask(message: &str) -> bool {
    ASK_RE.is_match(message) || message.contains("来道题")
}

fn algorithm_command(message: &str) -> Command {
    let difficulty = DIFFICULTY_RE
        .captures(message)
        .and_then(|captures| captures.get(1))
        .and_then(|m| Difficulty::from_str_loose(m.as_str()));
    let without_difficulty = DIFFICULTY_RE.replace_all(message, " ");
    let keyword = extract_keyword(&without_difficulty);

    let weak = keyword.chars().count() <= 2 || keyword == "题" || keyword == "算法题";
    if keyword.is_empty() || (weak && is_generic_ask(message)) {
        return Command::RandomLookup { difficulty };
    }
    Command::TitleLookup { keyword }
}

/// Strips request verbs and the trailing "…的算法题" so only the title remains.
#[must_use]
pub fn extract_keyword(message: &str) -> String {
    let flat = WHITESPACE_RE.replace_all(message.trim(), " ");
    let stripped = LEADING_REQUEST_RE.replace(&flat, "");
    let stripped = TRAILING_REQUEST_RE.replace(&stripped, "");
    stripped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(message: &str) -> Command {
        match classify(message) {
            Intent::Command(command) => command,
            Intent::Conversation => panic!("expected a command for {message:?}"),
        }
    }

    #[test]
    fn generic_asks_are_random() {
        for message in ["给我一道算法题", "来道题", "推荐一道题目吧", "来一道算法题！"] {
            assert_eq!(
                command(message),
                Command::RandomLookup { difficulty: None },
                "{message}"
            );
        }
    }

    #[test]
    fn difficulty_is_picked_up() {
        assert_eq!(
            command("给我一道中等难度的算法题"),
            Command::RandomLookup {
                difficulty: Some(Difficulty::Medium)
            }
        );
    }

    #[test]
    fn titled_requests_extract_keyword() {
        assert_eq!(
            command("给我一道编辑距离的算法题"),
            Command::TitleLookup {
                keyword: "编辑距离".to_string()
            }
        );
        assert_eq!(
            command("来一道反转链表 II 的题目"),
            Command::TitleLookup {
                keyword: "反转链表 II".to_string()
            }
        );
        assert_eq!(
            command("LRU缓存算法题"),
            Command::TitleLookup {
                keyword: "LRU缓存".to_string()
            }
        );
    }

    #[test]
    fn ids_are_detected() {
        assert_eq!(command("看看第 146 题"), Command::IdLookup { id: 146 });
        assert_eq!(command("ID为7的题目"), Command::IdLookup { id: 7 });
        assert_eq!(command("题目 id: 12"), Command::IdLookup { id: 12 });
    }

    #[test]
    fn fenced_code_with_run_verb_runs() {
        let message = "帮我运行一下这段代码\n```python\nprint(1)\n```";
        assert_eq!(
            command(message),
            Command::RunCode {
                language: "python".to_string(),
                code: "print(1)".to_string()
            }
        );

        let unlabeled = "run this\n```\nSystem.out.println(1);\n```";
        match command(unlabeled) {
            Command::RunCode { language, .. } => assert_eq!(language, "java"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn code_without_run_verb_is_conversation() {
        let message = "这段代码有什么问题？\n```java\nint a = 1\n```";
        assert_eq!(classify(message), Intent::Conversation);
    }

    #[test]
    fn experiences_capture_company_and_department() {
        assert_eq!(
            command("查一下字节后端的面经"),
            Command::SearchExperiences {
                query: "查一下字节后端的面经".to_string(),
                company: Some("字节".to_string()),
                department: Some("后端".to_string()),
            }
        );
    }

    #[test]
    fn small_talk_is_conversation() {
        assert_eq!(classify("你好"), Intent::Conversation);
        assert_eq!(classify("   "), Intent::Conversation);
    }

    #[test]
    fn keyword_extraction_keeps_inner_particles() {
        assert_eq!(extract_keyword("查询 二叉树的最大深度 这道题"), "二叉树的最大深度");
        assert_eq!(extract_keyword("算法题"), "");
    }
}
