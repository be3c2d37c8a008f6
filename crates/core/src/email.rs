//! Correspondence record types.

use alloc::string::String;
use chrono::{Datelike, NaiveDate};
use core::fmt;
use core::str::FromStr;

/// Identifier of an email record.
pub type EmailId = u64;

/// Identifier of a correspondent.
pub type PersonId = u64;

/// Job title of a correspondent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Title {
    Ceo,
    President,
    VicePresident,
    ManagingDirector,
    Director,
    Manager,
    Trader,
    Employee,
    InHouseLawyer,
    Unknown,
}

impl Title {
    /// All titles, ordered by rank.
    pub const ALL: [Title; 10] = [
        Title::Ceo,
        Title::President,
        Title::VicePresident,
        Title::ManagingDirector,
        Title::Director,
        Title::Manager,
        Title::Trader,
        Title::Employee,
        Title::InHouseLawyer,
        Title::Unknown,
    ];

    /// Returns the hierarchy rank of this title, 0 being the top.
    #[inline]
    pub fn rank(self) -> u8 {
        match self {
            Title::Ceo => 0,
            Title::President => 1,
            Title::VicePresident => 2,
            Title::ManagingDirector => 3,
            Title::Director => 4,
            Title::Manager => 5,
            Title::Trader => 6,
            Title::Employee => 7,
            Title::InHouseLawyer => 8,
            Title::Unknown => 9,
        }
    }

    /// Returns the title as it appears in the input data.
    pub fn as_str(self) -> &'static str {
        match self {
            Title::Ceo => "CEO",
            Title::President => "President",
            Title::VicePresident => "Vice President",
            Title::ManagingDirector => "Managing Director",
            Title::Director => "Director",
            Title::Manager => "Manager",
            Title::Trader => "Trader",
            Title::Employee => "Employee",
            Title::InHouseLawyer => "In House Lawyer",
            Title::Unknown => "Unknown",
        }
    }

    /// Parses a title, falling back to `Unknown` for unrecognised input.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|title| title.as_str() == s)
            .unwrap_or(Title::Unknown)
    }
}

impl FromStr for Title {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Title::parse(s))
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the receiver was addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageType {
    To,
    Cc,
}

/// A single email between two correspondents.
///
/// Equality compares `sentiment` bitwise, so every email equals itself.
#[derive(Clone, Debug)]
pub struct Email {
    pub id: EmailId,
    pub date: NaiveDate,
    pub from_id: PersonId,
    pub from_email: String,
    pub from_title: Title,
    pub to_id: PersonId,
    pub to_email: String,
    pub to_title: Title,
    pub message_type: MessageType,
    pub sentiment: f64,
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.date == other.date
            && self.from_id == other.from_id
            && self.from_email == other.from_email
            && self.from_title == other.from_title
            && self.to_id == other.to_id
            && self.to_email == other.to_email
            && self.to_title == other.to_title
            && self.message_type == other.message_type
            && self.sentiment.to_bits() == other.sentiment.to_bits()
    }
}

impl Email {
    /// Returns the date as a day number (days since the common era).
    #[inline]
    pub fn day(&self) -> i64 {
        self.date.num_days_from_ce() as i64
    }

    /// Returns the sending correspondent.
    pub fn sender(&self) -> Person {
        Person {
            id: self.from_id,
            title: self.from_title,
            email_address: self.from_email.clone(),
        }
    }

    /// Returns the receiving correspondent.
    pub fn receiver(&self) -> Person {
        Person {
            id: self.to_id,
            title: self.to_title,
            email_address: self.to_email.clone(),
        }
    }
}

/// A correspondent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Person {
    pub id: PersonId,
    pub title: Title,
    pub email_address: String,
}

impl Person {
    /// Derives a readable name from the email address.
    ///
    /// `kenneth.lay@enron.com` becomes `Kenneth Lay`; one-letter parts are
    /// treated as initials, so `k.lay@enron.com` becomes `K. Lay`.
    pub fn display_name(&self) -> String {
        let local = self.email_address.split('@').next().unwrap_or("");
        let local = local.replacen(' ', ".", 1);

        let mut name = String::new();
        for part in local.split('.') {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                name.extend(first.to_uppercase());
                name.push_str(chars.as_str());
            }
            if part.chars().count() == 1 {
                name.push_str(". ");
            } else {
                name.push(' ');
            }
        }
        name.pop();
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn person(address: &str) -> Person {
        Person {
            id: 1,
            title: Title::Employee,
            email_address: address.into(),
        }
    }

    #[test]
    fn test_title_parse() {
        assert_eq!(Title::parse("CEO"), Title::Ceo);
        assert_eq!(Title::parse("In House Lawyer"), Title::InHouseLawyer);
        assert_eq!(Title::parse(" Trader "), Title::Trader);
        assert_eq!(Title::parse("Janitor"), Title::Unknown);
        assert_eq!("Vice President".parse::<Title>(), Ok(Title::VicePresident));
    }

    #[test]
    fn test_title_rank_matches_order() {
        for (i, title) in Title::ALL.iter().enumerate() {
            assert_eq!(title.rank() as usize, i);
        }
    }

    #[test]
    fn test_title_display_round_trips() {
        for title in Title::ALL {
            assert_eq!(Title::parse(&title.to_string()), title);
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(person("kenneth.lay@enron.com").display_name(), "Kenneth Lay");
        assert_eq!(person("k.lay@enron.com").display_name(), "K. Lay");
        assert_eq!(person("louise kitchen@enron.com").display_name(), "Louise Kitchen");
        assert_eq!(person("tana").display_name(), "Tana");
    }

    #[test]
    fn test_email_with_nan_sentiment_equals_itself() {
        let email = Email {
            id: 1,
            date: NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
            from_id: 1,
            from_email: "a@x.com".into(),
            from_title: Title::Ceo,
            to_id: 2,
            to_email: "b@x.com".into(),
            to_title: Title::Trader,
            message_type: MessageType::To,
            sentiment: f64::NAN,
        };
        assert_eq!(email, email.clone());

        let mut changed = email.clone();
        changed.sentiment = 0.5;
        assert_ne!(email, changed);
    }
}
