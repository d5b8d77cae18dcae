//! Annotated tag record
//!
//! ## Payload format
//!
//! ```text
//! object <target-oid>
//! type <target-kind>
//! tag <name>
//! tagger <name> <email> <timestamp> <timezone>
//!
//! <tag message>
//! ```

use crate::objects::object_id::ObjectId;
use crate::objects::object_kind::ObjectKind;
use crate::objects::signature::Signature;
use anyhow::Context;
use std::io::BufRead;

#[derive(Debug, Clone, Eq, PartialEq, derive_new::new)]
pub struct TagRecord {
    target: ObjectId,
    target_kind: ObjectKind,
    name: String,
    tagger: Signature,
    message: String,
}

impl TagRecord {
    pub fn target(&self) -> &ObjectId {
        &self.target
    }

    pub fn target_kind(&self) -> ObjectKind {
        self.target_kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tagger(&self) -> &Signature {
        &self.tagger
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn from_payload(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        let mut lines = content.lines();

        let target = lines
            .next()
            .and_then(|line| line.strip_prefix("object "))
            .context("Invalid tag record: missing object line")?;
        let target = ObjectId::try_parse(target.to_string())?;

        let target_kind = lines
            .next()
            .and_then(|line| line.strip_prefix("type "))
            .context("Invalid tag record: missing type line")?;
        let target_kind = ObjectKind::try_from(target_kind)?;

        let name = lines
            .next()
            .and_then(|line| line.strip_prefix("tag "))
            .context("Invalid tag record: missing tag line")?
            .to_string();

        let tagger = lines
            .next()
            .and_then(|line| line.strip_prefix("tagger "))
            .context("Invalid tag record: missing tagger line")?;
        let tagger = Signature::try_from(tagger)?;

        // skip the empty separator line
        lines.next();

        let message = lines.collect::<Vec<&str>>().join("\n");
        Ok(TagRecord::new(target, target_kind, name, tagger, message))
    }

    pub fn to_payload(&self) -> String {
        let mut lines = vec![];

        lines.push(format!("object {}", self.target.as_ref()));
        lines.push(format!("type {}", self.target_kind));
        lines.push(format!("tag {}", self.name));
        lines.push(format!("tagger {}", self.tagger.display()));
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn payload_round_trip() {
        let tag = TagRecord::new(
            ObjectId::try_parse("1".repeat(40)).unwrap(),
            ObjectKind::Commit,
            "v1.0.0".to_string(),
            Signature::try_from("Jane <jane@example.com> 1000 +0000").unwrap(),
            "release".to_string(),
        );

        let parsed = TagRecord::from_payload(Cursor::new(tag.to_payload())).unwrap();
        assert_eq!(parsed, tag);
    }
}
