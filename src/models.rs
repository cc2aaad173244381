use sea_orm::FromQueryResult;
use serde::Deserialize;

use crate::entities::{movie, person, vote};

/// MPAA-style certification stored as an integer code.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rating {
    NotRated,
    G,
    Pg,
    R,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::NotRated, Rating::G, Rating::Pg, Rating::R];

    pub fn as_code(self) -> i32 {
        match self {
            Rating::NotRated => 0,
            Rating::G => 1,
            Rating::Pg => 2,
            Rating::R => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Rating::NotRated),
            1 => Some(Rating::G),
            2 => Some(Rating::Pg),
            3 => Some(Rating::R),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::NotRated => "NR - Not Rated",
            Rating::G => "G - General Audiences",
            Rating::Pg => "PG - Parental Guidance Suggested",
            Rating::R => "R - Restricted",
        }
    }
}

/// Signed unit contribution to a movie's score.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    pub fn as_code(self) -> i16 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(VoteValue::Up),
            -1 => Some(VoteValue::Down),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VoteValue::Up => "Good",
            VoteValue::Down => "Bad",
        }
    }
}

/// A movie row annotated with `SUM(votes.value)`; `score` is `None` for
/// movies nobody has voted on.
#[derive(Clone, Debug, FromQueryResult)]
pub struct MovieWithScore {
    pub id: i32,
    pub title: String,
    pub plot: String,
    pub year: i32,
    pub rating: i32,
    pub runtime: i32,
    pub website: Option<String>,
    pub director_id: Option<i32>,
    pub score: Option<i64>,
}

impl MovieWithScore {
    pub fn headline(&self) -> String {
        format!("{} ({})", self.title, self.year)
    }

    pub fn rating_label(&self) -> &'static str {
        Rating::from_code(self.rating).map_or("NR - Not Rated", Rating::label)
    }
}

#[derive(Clone, Debug)]
pub struct CastCredit {
    pub role_name: String,
    pub person: person::Model,
}

/// A movie detail bundle: the annotated row plus everyone credited on it.
#[derive(Clone, Debug)]
pub struct MovieCredits {
    pub movie: MovieWithScore,
    pub director: Option<person::Model>,
    pub writers: Vec<person::Model>,
    pub cast: Vec<CastCredit>,
}

#[derive(Clone, Debug)]
pub struct ActingCredit {
    pub role_name: String,
    pub movie: movie::Model,
}

#[derive(Clone, Debug)]
pub struct PersonCredits {
    pub person: person::Model,
    pub directed: Vec<movie::Model>,
    pub wrote: Vec<movie::Model>,
    pub acted: Vec<ActingCredit>,
}

pub fn person_headline(person: &person::Model) -> String {
    match &person.died {
        Some(died) => {
            format!("{} {} ({}-{})", person.last_name, person.first_name, person.born, died)
        }
        None => format!("{} {} ({})", person.last_name, person.first_name, person.born),
    }
}

/// A signed-in user's vote on one movie: either the persisted row or an
/// unsaved placeholder used to pre-populate the vote form.
#[derive(Clone, Debug)]
pub enum UserVote {
    Saved(vote::Model),
    Blank { movie_id: i32, user_id: i32 },
}

impl UserVote {
    pub fn value(&self) -> Option<VoteValue> {
        match self {
            UserVote::Saved(v) => VoteValue::from_code(v.value),
            UserVote::Blank { .. } => None,
        }
    }

    /// The endpoint the vote form should post to: update for an existing
    /// vote, create otherwise.
    pub fn form_action(&self) -> String {
        match self {
            UserVote::Saved(v) => format!("/movie/{}/vote/{}", v.movie_id, v.id),
            UserVote::Blank { movie_id, .. } => format!("/movie/{movie_id}/vote"),
        }
    }
}

// Form payloads.

#[derive(Debug, Deserialize)]
pub struct VoteForm {
    pub value: i16,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct NewMovieForm {
    pub title: String,
    pub plot: String,
    pub year: i32,
    pub rating: i32,
    pub runtime: i32,
    pub website: String,
    // Submitted by a <select>; empty string means no director.
    pub director_id: String,
}

#[derive(Debug, Deserialize)]
pub struct NewPersonForm {
    pub first_name: String,
    pub last_name: String,
    pub born: String,
    pub died: String,
}

#[derive(Debug, Deserialize)]
pub struct NewCreditForm {
    pub movie_id: i32,
    pub person_id: i32,
    pub credit: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_codes_round_trip() {
        for rating in Rating::ALL {
            assert_eq!(Rating::from_code(rating.as_code()), Some(rating));
        }
        assert_eq!(Rating::from_code(7), None);
    }

    #[test]
    fn vote_value_rejects_unknown_codes() {
        assert_eq!(VoteValue::from_code(1), Some(VoteValue::Up));
        assert_eq!(VoteValue::from_code(-1), Some(VoteValue::Down));
        assert_eq!(VoteValue::from_code(0), None);
        assert_eq!(VoteValue::from_code(2), None);
    }

    #[test]
    fn blank_vote_targets_create_endpoint() {
        let blank = UserVote::Blank { movie_id: 9, user_id: 3 };
        assert_eq!(blank.form_action(), "/movie/9/vote");
        assert_eq!(blank.value(), None);
    }
}
