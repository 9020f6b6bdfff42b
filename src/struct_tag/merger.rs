use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;

use crate::struct_tag::{
    matcher::find_tag_groups,
    tag::{mentions_key, strip_delimiters, Tag, TagGroup, MIRROR_KEY, PRIMARY_KEY},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rewrite {
    pub original: String,
    pub rewritten: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct MirroredText {
    pub text: String,
    pub rewrites: Vec<Rewrite>,
}

impl MirroredText {
    pub fn is_changed(&self) -> bool {
        !self.rewrites.is_empty()
    }
}

// json を持たない group は None
pub fn mirror_tag_group<'a>(group: &TagGroup<'a>) -> Option<TagGroup<'a>> {
    let primary = group.value_of(PRIMARY_KEY)?;

    // 順序は最初に現れた位置，値は最後のもの
    let mut merged = IndexMap::<&str, &str>::new();
    let mirror = Tag {
        key: MIRROR_KEY,
        value: primary,
    };
    for tag in group.tags.iter().chain([&mirror]) {
        merged.insert(tag.key, tag.value);
    }

    let tags = merged
        .into_iter()
        .map(|(key, value)| Tag { key, value })
        .filter(|t| !t.is_empty())
        .collect();

    Some(TagGroup { tags })
}

// 1 つでも壊れた group があればテキスト全体を諦める
pub fn mirror_tags(text: &str) -> Result<MirroredText> {
    let mut updated = text.to_owned();
    let mut rewrites = Vec::new();

    for raw in find_tag_groups(text) {
        // json を持たない group は中身を見ずに飛ばす
        let body = strip_delimiters(raw)?;
        if !mentions_key(body, PRIMARY_KEY) {
            continue;
        }

        let group = TagGroup::parse(body)
            .with_context(|| format!("Failed to parse tag group {}", raw))?;

        let Some(mirrored) = mirror_tag_group(&group) else {
            continue;
        };

        let rewritten = mirrored.delimited();
        if rewritten == raw {
            continue;
        }

        updated = updated.replacen(raw, &rewritten, 1);
        rewrites.push(Rewrite {
            original: raw.to_owned(),
            rewritten,
        });
    }

    Ok(MirroredText {
        text: updated,
        rewrites,
    })
}
