//! Author and committer identities
//!
//! A signature is a name, an email, and a timestamp with timezone, stored in
//! the `"name <email> <unix-seconds> <offset>"` line format.

/// Author or committer identity
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Signature {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Signature {
    pub fn new(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Signature {
            name,
            email,
            timestamp,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }

    /// Format name and email for display
    ///
    /// # Returns
    ///
    /// String in format "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// Timestamp in the long human-readable log format
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format("%a %b %-d %H:%M:%S %Y %z").to_string()
    }

    /// Format the complete identity including timestamp
    ///
    /// # Returns
    ///
    /// String in format "Name <email> timestamp timezone"
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }
}

impl TryFrom<&str> for Signature {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Format: "name <email> timestamp timezone"
        // Split from the right to get timezone and timestamp first
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(anyhow::anyhow!("Invalid signature format"));
        }

        let timezone = parts[0];
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Invalid timestamp"))?;
        let name_email_part = parts[2]; // "name <email>"

        let email_start = name_email_part
            .find('<')
            .ok_or_else(|| anyhow::anyhow!("Invalid signature format: missing '<'"))?;
        let email_end = name_email_part
            .find('>')
            .ok_or_else(|| anyhow::anyhow!("Invalid signature format: missing '>'"))?;

        let name = name_email_part[..email_start].trim().to_string();
        let email = name_email_part[email_start + 1..email_end].to_string();

        let offset_secs = parse_offset(timezone)?;
        let offset = chrono::FixedOffset::east_opt(offset_secs)
            .ok_or_else(|| anyhow::anyhow!("Invalid timezone offset: {timezone}"))?;
        let datetime = chrono::DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid timestamp"))?
            .with_timezone(&offset);

        Ok(Signature {
            name,
            email,
            timestamp: datetime,
        })
    }
}

/// Parse a `+HHMM`/`-HHMM` offset into seconds east of UTC
fn parse_offset(timezone: &str) -> anyhow::Result<i32> {
    if timezone.len() != 5 {
        return Err(anyhow::anyhow!("Invalid timezone offset: {timezone}"));
    }

    let sign = match &timezone[..1] {
        "+" => 1,
        "-" => -1,
        _ => return Err(anyhow::anyhow!("Invalid timezone offset: {timezone}")),
    };
    let hours: i32 = timezone[1..3]
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid timezone offset: {timezone}"))?;
    let minutes: i32 = timezone[3..5]
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid timezone offset: {timezone}"))?;

    Ok(sign * (hours * 3600 + minutes * 60))
}
