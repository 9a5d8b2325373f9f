use serde::{Deserialize, Serialize};

use crate::link::primary_problem_url;

/// Known problem titles and keywords, mapped to leetcode.cn slugs. Order matters.
const TITLE_TO_SLUG: &[(&str, &str)] = &[
    ("分糖果", "candy"),
    ("分发糖果", "candy"),
    ("完全平方数", "perfect-squares"),
    ("两数之和", "two-sum"),
    ("反转链表", "reverse-linked-list"),
    ("LRU缓存", "lru-cache"),
    ("LRU 缓存", "lru-cache"),
    ("搜索插入位置", "search-insert-position"),
    ("二叉树中序遍历", "binary-tree-inorder-traversal"),
    ("三数之和", "3sum"),
    ("无重复字符的最长子串", "longest-substring-without-repeating-characters"),
    ("两数相加", "add-two-numbers"),
    ("盛最多水的容器", "container-with-most-water"),
    ("最长回文子串", "longest-palindromic-substring"),
    ("合并两个有序链表", "merge-two-sorted-lists"),
    ("有效的括号", "valid-parentheses"),
    ("爬楼梯", "climbing-stairs"),
    ("二叉树的最大深度", "maximum-depth-of-binary-tree"),
    ("对称二叉树", "symmetric-tree"),
    ("二叉树的层序遍历", "binary-tree-level-order-traversal"),
    ("最大子数组和", "maximum-subarray"),
    ("合并区间", "merge-intervals"),
    ("接雨水", "trapping-rain-water"),
    ("全排列", "permutations"),
    ("子集", "subsets"),
    ("组合总和", "combination-sum"),
    ("括号生成", "generate-parentheses"),
    ("二叉树的最近公共祖先", "lowest-common-ancestor-of-a-binary-tree"),
    ("排序链表", "sort-list"),
    ("岛屿数量", "number-of-islands"),
    ("买卖股票的最佳时机", "best-time-to-buy-and-sell-stock"),
    ("环形链表", "linked-list-cycle"),
    ("相交链表", "intersection-of-two-linked-lists"),
    ("反转链表 II", "reverse-linked-list-ii"),
    ("删除链表的倒数第N个节点", "remove-nth-node-from-end-of-list"),
    ("有效的数独", "valid-sudoku"),
    ("字符串转换整数", "string-to-integer-atoi"),
    ("整数反转", "reverse-integer"),
    ("回文数", "palindrome-number"),
    ("每日温度", "daily-temperatures"),
    ("有效括号", "valid-parentheses"),
    ("跳跃游戏", "jump-game"),
    ("最小栈", "min-stack"),
    ("杨辉三角", "pascals-triangle"),
    ("帕斯卡三角", "pascals-triangle"),
];

/// How a non-exact keyword is matched against mapping keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// First entry, in table order, where either side contains the other.
    #[default]
    FirstMatch,
    /// Among containing entries, the longest key; table order breaks ties.
    LongestKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedProblem {
    pub key: &'static str,
    pub slug: &'static str,
    pub url: String,
}

/// Static title → external slug table.
#[derive(Debug, Clone, Copy)]
pub struct SlugMapping {
    entries: &'static [(&'static str, &'static str)],
    policy: MatchPolicy,
}

impl Default for SlugMapping {
    fn default() -> Self {
        Self::new(MatchPolicy::default())
    }
}

impl SlugMapping {
    #[must_use]
    pub fn new(policy: MatchPolicy) -> Self {
        Self {
            entries: TITLE_TO_SLUG,
            policy,
        }
    }

    #[must_use]
    pub fn with_entries(
        entries: &'static [(&'static str, &'static str)],
        policy: MatchPolicy,
    ) -> Self {
        Self { entries, policy }
    }

    #[must_use]
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact key first, then containment in either direction.
    #[must_use]
    pub fn resolve(&self, keyword: &str) -> Option<MappedProblem> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return None;
        }

        if let Some(&(key, slug)) = self.entries.iter().find(|(key, _)| *key == keyword) {
            return Some(Self::mapped(key, slug));
        }

        let mut containing = self
            .entries
            .iter()
            .filter(|(key, _)| keyword.contains(key) || key.contains(keyword));

        let chosen = match self.policy {
            MatchPolicy::FirstMatch => containing.next(),
            MatchPolicy::LongestKey => containing.fold(None, |best: Option<&(&str, &str)>, entry| {
                match best {
                    Some(current) if current.0.chars().count() >= entry.0.chars().count() => {
                        Some(current)
                    }
                    _ => Some(entry),
                }
            }),
        };

        chosen.map(|&(key, slug)| Self::mapped(key, slug))
    }

    fn mapped(key: &'static str, slug: &'static str) -> MappedProblem {
        MappedProblem {
            key,
            slug,
            url: primary_problem_url(slug),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_key_resolves() {
        let mapping = SlugMapping::default();
        let mapped = mapping.resolve("分糖果").unwrap();
        assert_eq!(mapped.slug, "candy");
        assert_eq!(mapped.url, "https://leetcode.cn/problems/candy/");
    }

    #[test]
    fn exact_key_beats_earlier_containing_key() {
        let mapping = SlugMapping::default();
        assert_eq!(
            mapping.resolve("反转链表 II").unwrap().slug,
            "reverse-linked-list-ii"
        );
    }

    #[test]
    fn containment_uses_table_order_by_default() {
        let mapping = SlugMapping::default();
        assert_eq!(
            mapping.resolve("反转链表 II 递归写法").unwrap().slug,
            "reverse-linked-list"
        );
        assert_eq!(mapping.resolve("接雨水 双指针").unwrap().slug, "trapping-rain-water");
        assert_eq!(mapping.resolve("糖果").unwrap().slug, "candy");
    }

    #[test]
    fn longest_key_policy_prefers_specific_entry() {
        let mapping = SlugMapping::new(MatchPolicy::LongestKey);
        assert_eq!(
            mapping.resolve("反转链表 II 递归写法").unwrap().slug,
            "reverse-linked-list-ii"
        );
    }

    #[test]
    fn unknown_and_blank_keywords_miss() {
        let mapping = SlugMapping::default();
        assert!(mapping.resolve("编辑距离").is_none());
        assert!(mapping.resolve("  ").is_none());
    }

    #[test]
    fn custom_entries_are_honoured() {
        static ENTRIES: &[(&str, &str)] = &[("unique paths", "unique-paths")];
        let mapping = SlugMapping::with_entries(ENTRIES, MatchPolicy::FirstMatch);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.resolve("unique paths").unwrap().slug, "unique-paths");
    }
}
