// Go の struct tag のような `key:"value" key:"value"` 形式の注釈を扱う
//
// json を持つ tag group には同じ値の msgpack を必ず持たせる：
//   `json:"id" yaml:"id"` => `json:"id" yaml:"id" msgpack:"id"`

pub mod matcher;
pub mod merger;
pub mod tag;
