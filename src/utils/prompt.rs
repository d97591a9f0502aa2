//! # 交互确认
//!
//! 运行前检查所需的是/否确认能力，可注入以便测试。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 的预检使用
//! - 使用 `console` crate 读取终端输入

use console::Term;
use std::io::{self, BufRead, IsTerminal};

/// 是/否确认能力
pub trait Confirm {
    fn confirm(&self, question: &str) -> bool;
}

/// 闭包即确认能力
impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, question: &str) -> bool {
        self(question)
    }
}

/// 终端交互确认
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, question: &str) -> bool {
        let term = Term::stdout();
        if term.write_str(&format!("{} [y/n] ", question)).is_err() {
            return false;
        }

        // 非终端 stdin（管道、重定向）按行读取回答
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            let answered = read_answer(stdin.lock());
            let _ = term.write_line("");
            return answered;
        }

        term.read_line().map(|answer| is_affirmative(&answer)).unwrap_or(false)
    }
}

/// 从输入流读取一行回答；读取失败或输入结束视为否定
pub fn read_answer<R: BufRead>(mut reader: R) -> bool {
    let mut answer = String::new();
    match reader.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => is_affirmative(&answer),
    }
}

/// 判断回答是否为肯定（y, yes, t, true, on, 1，不区分大小写）
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "t" | "true" | "on" | "1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative(" YES\n"));
        assert!(is_affirmative("True"));
        assert!(is_affirmative("on"));
        assert!(is_affirmative("1"));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("0"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("maybe"));
    }

    #[test]
    fn test_read_answer_from_stream() {
        assert!(read_answer(io::Cursor::new("y\n")));
        assert!(read_answer(io::Cursor::new("yes\nno\n")));
        assert!(!read_answer(io::Cursor::new("n\n")));
        assert!(!read_answer(io::Cursor::new("")));
    }

    #[test]
    fn test_closure_confirm() {
        let yes = |_: &str| true;
        let no = |_: &str| false;
        assert!(yes.confirm("proceed?"));
        assert!(!no.confirm("proceed?"));
    }
}
