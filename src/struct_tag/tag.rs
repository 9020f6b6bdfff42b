use std::fmt;

use anyhow::{bail, Context, Result};

pub const DELIMITER: char = '`';

// 値の複製元
pub const PRIMARY_KEY: &str = "json";
// 複製先
pub const MIRROR_KEY: &str = "msgpack";

pub const RECOGNIZED_KEYS: [&str; 3] = [PRIMARY_KEY, "yaml", MIRROR_KEY];

// key:"value"
// value は引用符を含んだまま保持する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> Tag<'a> {
    pub fn parse(token: &'a str) -> Result<Tag<'a>> {
        let mut parts = token.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => Ok(Tag { key, value }),
            _ => bail!("Malformed tag: {:?}", token),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty() || self.value.is_empty()
    }
}

impl fmt::Display for Tag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup<'a> {
    pub tags: Vec<Tag<'a>>,
}

impl<'a> TagGroup<'a> {
    // `...` の区切り文字ごと受け取る
    pub fn parse_delimited(raw: &'a str) -> Result<TagGroup<'a>> {
        Self::parse(strip_delimiters(raw)?)
    }

    pub fn parse(body: &'a str) -> Result<TagGroup<'a>> {
        let tags = body
            .split_whitespace()
            .map(Tag::parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(TagGroup { tags })
    }

    // 重複時は最後のものが残るので最後の値を返す
    pub fn value_of(&self, key: &str) -> Option<&'a str> {
        self.tags.iter().rev().find(|t| t.key == key).map(|t| t.value)
    }

    pub fn delimited(&self) -> String {
        format!("{}{}{}", DELIMITER, self, DELIMITER)
    }
}

impl fmt::Display for TagGroup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.tags.iter().enumerate() {
            if i != 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", tag)?;
        }
        Ok(())
    }
}

pub fn strip_delimiters(raw: &str) -> Result<&str> {
    raw.strip_prefix(DELIMITER)
        .and_then(|s| s.strip_suffix(DELIMITER))
        .with_context(|| format!("Tag group is not delimited: {:?}", raw))
}

// 厳密に parse する前の判定
// 各 token の最初の ':' より前を key とみなす
pub fn mentions_key(body: &str, key: &str) -> bool {
    body.split_whitespace()
        .any(|token| token.split(':').next() == Some(key))
}
