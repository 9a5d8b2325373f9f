//! Text rendered for each command before it reaches the sanitizer.

use crate::collaborators::ExecutionResult;
use crate::resolver::{ResolutionResult, ResolutionSource};

pub const DESCRIPTION_LIMIT: usize = 400;
pub const STDOUT_LIMIT: usize = 500;
pub const EXPERIENCE_LIMIT: usize = 600;
pub const EXPERIENCE_RESULTS: usize = 5;

pub const USAGE_HINT: &str =
    "请输入您的问题，例如：查一下字节后端的面经、给我一道中等难度的算法题、运行这段 Java 代码。";
pub const NOT_FOUND: &str = "抱歉，未找到相关题目。";
pub const NO_EXPERIENCES: &str = "未找到相关面经。可以先录入面经，或换一个公司/部门再试。";
pub const EMPTY_CODE: &str = "代码为空，无法执行。";
pub const PRODUCER_FAILED: &str = "抱歉，助手暂时无法回答，请稍后再试。";

/// How a resolution was requested; it changes the lead sentence only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Random,
    ByTitle,
    ById(u64),
}

#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(limit).collect();
    truncated.push_str("...");
    truncated
}

#[must_use]
pub fn render_resolution(result: &ResolutionResult, kind: LookupKind) -> String {
    match result.source {
        Some(ResolutionSource::Local) => render_local(result, kind),
        Some(ResolutionSource::Mapped) => "本地暂无，已匹配到力扣原题。".to_string(),
        Some(ResolutionSource::ExternalVerified) => "本地暂无，已联网搜索到力扣原题。".to_string(),
        Some(ResolutionSource::SearchListing) => {
            "该题不在本站题库中，可点击下方链接在力扣站内搜索。".to_string()
        }
        None => match kind {
            LookupKind::ById(id) => format!("未找到 ID 为 {id} 的题目。"),
            _ => NOT_FOUND.to_string(),
        },
    }
}

fn render_local(result: &ResolutionResult, kind: LookupKind) -> String {
    let Some(problem) = &result.problem else {
        return "本地题库已找到该题。".to_string();
    };
    let mut text = match kind {
        LookupKind::Random => {
            format!("已为您随机抽取一道题，难度：{}。", problem.difficulty_label())
        }
        LookupKind::ByTitle | LookupKind::ById(_) => "本地题库已找到该题。".to_string(),
    };
    text.push_str(&format!(
        "\n\n题目：{}（难度：{}）",
        problem.title,
        problem.difficulty_label()
    ));
    let description = problem.description.trim();
    if !description.is_empty() {
        text.push_str("\n\n");
        text.push_str(&truncate_chars(description, DESCRIPTION_LIMIT));
    }
    text
}

#[must_use]
pub fn render_execution(result: &ExecutionResult) -> String {
    if result.succeeded() {
        let stdout = result.stdout.trim_end();
        if stdout.is_empty() {
            return "执行成功，无标准输出。".to_string();
        }
        return format!("执行成功。输出：\n{}", truncate_chars(stdout, STDOUT_LIMIT));
    }
    let stderr = result.stderr.trim();
    let stderr = if stderr.is_empty() { "未知错误" } else { stderr };
    format!("执行失败（退出码 {}）：{stderr}", result.exit_code)
}

#[must_use]
pub fn render_experiences(snippets: &[String]) -> String {
    if snippets.is_empty() {
        return NO_EXPERIENCES.to_string();
    }
    snippets
        .iter()
        .take(EXPERIENCE_RESULTS)
        .map(|snippet| truncate_chars(snippet.trim(), EXPERIENCE_LIMIT))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Difficulty, Problem};

    fn local(problem: Problem) -> ResolutionResult {
        ResolutionResult {
            title: problem.title.clone(),
            url: Some(problem.resource_url("http://localhost:8080")),
            source: Some(ResolutionSource::Local),
            found: true,
            problem: Some(problem),
        }
    }

    #[test]
    fn random_reply_mentions_difficulty_and_truncates_description() {
        let problem = Problem::new(146, "LRU 缓存", Some(Difficulty::Medium))
            .with_description("设".repeat(450));
        let text = render_resolution(&local(problem), LookupKind::Random);
        assert!(text.starts_with("已为您随机抽取一道题，难度：medium。"));
        assert!(text.ends_with("..."));
        assert!(text.chars().filter(|c| *c == '设').count() == DESCRIPTION_LIMIT);
    }

    #[test]
    fn missing_id_names_the_id() {
        let result = ResolutionResult {
            title: "42".to_string(),
            url: None,
            source: None,
            found: false,
            problem: None,
        };
        assert_eq!(render_resolution(&result, LookupKind::ById(42)), "未找到 ID 为 42 的题目。");
        assert_eq!(render_resolution(&result, LookupKind::ByTitle), NOT_FOUND);
    }

    #[test]
    fn execution_summaries() {
        let ok = ExecutionResult {
            exit_code: 0,
            stdout: "x".repeat(600),
            stderr: String::new(),
        };
        let text = render_execution(&ok);
        assert!(text.starts_with("执行成功。输出：\n"));
        assert!(text.ends_with("..."));

        let failed = ExecutionResult {
            exit_code: 1,
            stdout: String::new(),
            stderr: "NullPointerException".to_string(),
        };
        assert_eq!(render_execution(&failed), "执行失败（退出码 1）：NullPointerException");
    }

    #[test]
    fn experiences_are_capped() {
        let snippets: Vec<String> = (0..8).map(|i| format!("面经 {i} {}", "长".repeat(700))).collect();
        let text = render_experiences(&snippets);
        assert_eq!(text.split("\n\n").count(), EXPERIENCE_RESULTS);
        assert_eq!(render_experiences(&[]), NO_EXPERIENCES);
    }
}
