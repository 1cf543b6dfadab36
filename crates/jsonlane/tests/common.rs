#![allow(missing_docs, dead_code)]

use jsonlane::{DecodeArray, DecodeObject, Decoder, EmbeddedJson, EncodeArray, EncodeObject, Encoder, Result};

/// A nested document touching every kind of value.
pub const DOCUMENT: &str = r#"
{
    "moderation": {
        "decision": "allow",
        "reason": null
    },
    "request": {
        "filename": "example.rs",
        "language": "rust",
        "options": {
            "opt_level": "2",
            "features": ["serde", "tokio"]
        }
    },
    "snippets": ["fn main() {}", "println!(\"hi\")"],
    "matrix": [["a"], [], [1.5, -2, true]],
    "count": 3
}
"#;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tags(pub Vec<String>);

impl<'de> DecodeArray<'de> for Tags {
    fn decode_element(&mut self, dec: &mut Decoder<'de>) -> Result<()> {
        let mut tag = String::new();
        dec.string(&mut tag)?;
        self.0.push(tag);
        Ok(())
    }
}

impl EncodeArray for Tags {
    fn encode_array(&self, enc: &mut Encoder<'_>) {
        for tag in &self.0 {
            enc.string(tag);
        }
    }

    fn is_nil(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub score: f64,
    pub active: bool,
    pub tags: Tags,
    pub friend: Option<Box<User>>,
}

impl<'de> DecodeObject<'de> for User {
    fn decode_key(&mut self, dec: &mut Decoder<'de>, key: &str) -> Result<()> {
        match key {
            "id" => dec.int64(&mut self.id),
            "name" => dec.string(&mut self.name),
            "email" => dec.string_null(&mut self.email),
            "score" => dec.float64(&mut self.score),
            "active" => dec.bool(&mut self.active),
            "tags" => dec.array(&mut self.tags),
            "friend" => dec.object_null(&mut self.friend),
            _ => Ok(()),
        }
    }

    fn key_count(&self) -> usize {
        7
    }
}

impl<'de> DecodeObject<'de> for Box<User> {
    fn decode_key(&mut self, dec: &mut Decoder<'de>, key: &str) -> Result<()> {
        (**self).decode_key(dec, key)
    }

    fn key_count(&self) -> usize {
        (**self).key_count()
    }
}

impl EncodeObject for User {
    fn encode_object(&self, enc: &mut Encoder<'_>) {
        enc.int64_key("id", self.id);
        enc.string_key("name", &self.name);
        match &self.email {
            Some(email) => enc.string_key("email", email),
            None => enc.null_key("email"),
        }
        enc.float64_key_omit_empty("score", self.score);
        enc.bool_key("active", self.active);
        enc.array_key_omit_empty("tags", &self.tags);
        if let Some(friend) = &self.friend {
            enc.object_key("friend", friend.as_ref());
        }
    }
}

pub fn sample_user() -> User {
    User {
        id: 42,
        name: "Ada \"the first\"".into(),
        email: None,
        score: 99.5,
        active: true,
        tags: Tags(vec!["admin".into(), "ops".into()]),
        friend: Some(Box::new(User {
            id: 7,
            name: "Grace".into(),
            email: Some("grace@example.com".into()),
            ..User::default()
        })),
    }
}

/// A request whose parameters are carried through verbatim.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Request {
    pub id: String,
    pub method: String,
    pub params: EmbeddedJson,
}

impl<'de> DecodeObject<'de> for Request {
    fn decode_key(&mut self, dec: &mut Decoder<'de>, key: &str) -> Result<()> {
        match key {
            "id" => dec.string(&mut self.id),
            "method" => dec.string(&mut self.method),
            "params" => dec.embedded_json(&mut self.params),
            _ => Ok(()),
        }
    }

    fn key_count(&self) -> usize {
        3
    }
}

impl EncodeObject for Request {
    fn encode_object(&self, enc: &mut Encoder<'_>) {
        enc.string_key("id", &self.id);
        enc.string_key("method", &self.method);
        enc.embedded_json_key_omit_empty("params", &self.params);
    }
}

/// Two fields in a row, written with the omit-empty writers.
pub struct OmitEmpty {
    pub field: String,
    pub count: i64,
}

impl EncodeObject for OmitEmpty {
    fn encode_object(&self, enc: &mut Encoder<'_>) {
        enc.string_key_omit_empty("field", &self.field);
        enc.int64_key_omit_empty("count", self.count);
    }
}

/// One empty field, written with the null-empty writers.
pub struct NullEmpty {
    pub field: String,
}

impl EncodeObject for NullEmpty {
    fn encode_object(&self, enc: &mut Encoder<'_>) {
        enc.string_key_null_empty("field", &self.field);
    }
}
