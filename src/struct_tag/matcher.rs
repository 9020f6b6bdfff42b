use once_cell::sync::Lazy;
use regex::Regex;

use crate::struct_tag::tag::{DELIMITER, RECOGNIZED_KEYS};

// `((json|yaml|msgpack):"\S+"\s?)+`
// 閉じの ` まで含めるので，知らない key が混ざった group は一致しない
static REGEX_TAG_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"{delimiter}(({keys}):"\S+"\s?)+{delimiter}"#,
        delimiter = DELIMITER,
        keys = RECOGNIZED_KEYS.join("|"),
    ))
    .unwrap()
});

// 区切り文字を含む tag group を左から順に列挙する
pub fn find_tag_groups(text: &str) -> impl Iterator<Item = &str> {
    REGEX_TAG_GROUP.find_iter(text).map(|m| m.as_str())
}
