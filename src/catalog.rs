use std::collections::HashMap;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::{movie, movie_image, movie_writer, person, role, vote};
use crate::error::{AppError, AppResult};
use crate::models::{
    ActingCredit, CastCredit, MovieCredits, MovieWithScore, PersonCredits, Rating, UserVote,
    VoteValue,
};

pub const TOP_MOVIES_LIMIT: u64 = 10;

/// Query layer over the relational store. All reads return concrete lists;
/// the score annotation is `SUM(votes.value)` over a left join, so movies
/// without votes come back with `score = None`.
#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// One page of movies in listing order (year desc, title asc), each with
    /// its score. `page` is zero-based. Also returns the total page count.
    pub async fn movies_with_score(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<MovieWithScore>, u64)> {
        let paginator = movie::Entity::find()
            .column_as(vote::Column::Value.sum(), "score")
            .join(JoinType::LeftJoin, movie::Relation::Vote.def())
            .group_by(movie::Column::Id)
            .order_by_desc(movie::Column::Year)
            .order_by_asc(movie::Column::Title)
            .into_model::<MovieWithScore>()
            .paginate(&self.db, per_page.max(1));

        let total_pages = paginator.num_pages().await?;
        let movies = paginator.fetch_page(page).await?;
        Ok((movies, total_pages))
    }

    /// Movies with at least one vote, best score first, truncated to `limit`.
    pub async fn top_movies(&self, limit: u64) -> AppResult<Vec<MovieWithScore>> {
        let movies = movie::Entity::find()
            .column_as(vote::Column::Value.sum(), "score")
            .join(JoinType::LeftJoin, movie::Relation::Vote.def())
            .group_by(movie::Column::Id)
            .having(Expr::expr(vote::Column::Value.sum()).is_not_null())
            .order_by_desc(vote::Column::Value.sum())
            .limit(limit)
            .into_model::<MovieWithScore>()
            .all(&self.db)
            .await?;
        Ok(movies)
    }

    /// A movie with its score, director, writers, and cast. `None` when the
    /// id does not exist.
    pub async fn movie_with_credits(&self, id: i32) -> AppResult<Option<MovieCredits>> {
        let Some(movie) = movie::Entity::find_by_id(id)
            .column_as(vote::Column::Value.sum(), "score")
            .join(JoinType::LeftJoin, movie::Relation::Vote.def())
            .group_by(movie::Column::Id)
            .into_model::<MovieWithScore>()
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let director = match movie.director_id {
            Some(pid) => person::Entity::find_by_id(pid).one(&self.db).await?,
            None => None,
        };

        let writer_ids: Vec<i32> = movie_writer::Entity::find()
            .filter(movie_writer::Column::MovieId.eq(id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|w| w.person_id)
            .collect();
        let writers = if writer_ids.is_empty() {
            Vec::new()
        } else {
            person::Entity::find()
                .filter(person::Column::Id.is_in(writer_ids))
                .order_by_asc(person::Column::LastName)
                .order_by_asc(person::Column::FirstName)
                .all(&self.db)
                .await?
        };

        let roles = role::Entity::find()
            .filter(role::Column::MovieId.eq(id))
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await?;
        let people = self.people_by_ids(roles.iter().map(|r| r.person_id).collect()).await?;
        let cast = roles
            .into_iter()
            .filter_map(|r| {
                people
                    .get(&r.person_id)
                    .map(|p| CastCredit { role_name: r.name, person: p.clone() })
            })
            .collect();

        Ok(Some(MovieCredits { movie, director, writers, cast }))
    }

    /// A person with everything they directed, wrote, and acted in.
    pub async fn person_with_credits(&self, id: i32) -> AppResult<Option<PersonCredits>> {
        let Some(person) = person::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let directed = movie::Entity::find()
            .filter(movie::Column::DirectorId.eq(id))
            .order_by_desc(movie::Column::Year)
            .order_by_asc(movie::Column::Title)
            .all(&self.db)
            .await?;

        let written_ids: Vec<i32> = movie_writer::Entity::find()
            .filter(movie_writer::Column::PersonId.eq(id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|w| w.movie_id)
            .collect();
        let wrote = if written_ids.is_empty() {
            Vec::new()
        } else {
            movie::Entity::find()
                .filter(movie::Column::Id.is_in(written_ids))
                .order_by_desc(movie::Column::Year)
                .order_by_asc(movie::Column::Title)
                .all(&self.db)
                .await?
        };

        let roles = role::Entity::find()
            .filter(role::Column::PersonId.eq(id))
            .all(&self.db)
            .await?;
        let movie_ids: Vec<i32> = roles.iter().map(|r| r.movie_id).collect();
        let movies: HashMap<i32, movie::Model> = if movie_ids.is_empty() {
            HashMap::new()
        } else {
            movie::Entity::find()
                .filter(movie::Column::Id.is_in(movie_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|m| (m.id, m))
                .collect()
        };
        let mut acted: Vec<ActingCredit> = roles
            .into_iter()
            .filter_map(|r| {
                movies
                    .get(&r.movie_id)
                    .map(|m| ActingCredit { role_name: r.name, movie: m.clone() })
            })
            .collect();
        acted.sort_by(|a, b| {
            b.movie.year.cmp(&a.movie.year).then_with(|| a.movie.title.cmp(&b.movie.title))
        });

        Ok(Some(PersonCredits { person, directed, wrote, acted }))
    }

    /// The user's persisted vote on a movie, or an unsaved placeholder when
    /// they have not voted yet.
    pub async fn vote_or_blank(&self, movie_id: i32, user_id: i32) -> AppResult<UserVote> {
        let existing = vote::Entity::find()
            .filter(vote::Column::MovieId.eq(movie_id))
            .filter(vote::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(match existing {
            Some(v) => UserVote::Saved(v),
            None => UserVote::Blank { movie_id, user_id },
        })
    }

    /// First-time vote. A duplicate (movie, user) pair is rejected by the
    /// unique index, not handled specially here.
    pub async fn cast_vote(
        &self,
        movie_id: i32,
        user_id: i32,
        value: VoteValue,
    ) -> AppResult<vote::Model> {
        let model = vote::ActiveModel {
            id: Default::default(),
            value: Set(value.as_code()),
            movie_id: Set(movie_id),
            user_id: Set(user_id),
            voted_on: Set(now_sec()),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Change an existing vote. Only the vote's owner may do this.
    pub async fn update_vote(
        &self,
        vote_id: i32,
        movie_id: i32,
        user_id: i32,
        value: VoteValue,
    ) -> AppResult<vote::Model> {
        let Some(existing) = vote::Entity::find_by_id(vote_id).one(&self.db).await? else {
            return Err(AppError::NotFound);
        };
        if existing.movie_id != movie_id {
            return Err(AppError::NotFound);
        }
        if existing.user_id != user_id {
            return Err(AppError::Forbidden("Cannot change another user's vote".to_string()));
        }

        let mut active: vote::ActiveModel = existing.into();
        active.value = Set(value.as_code());
        active.voted_on = Set(now_sec());
        Ok(active.update(&self.db).await?)
    }

    pub async fn movie_exists(&self, id: i32) -> AppResult<bool> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?.is_some())
    }

    pub async fn movie_images(&self, movie_id: i32) -> AppResult<Vec<movie_image::Model>> {
        let images = movie_image::Entity::find()
            .filter(movie_image::Column::MovieId.eq(movie_id))
            .order_by_desc(movie_image::Column::Uploaded)
            .all(&self.db)
            .await?;
        Ok(images)
    }

    /// Record an uploaded file; `image` is the path relative to the media
    /// root, `{movie_id}/{uuid}`.
    pub async fn add_movie_image(
        &self,
        movie_id: i32,
        user_id: i32,
        image: &str,
    ) -> AppResult<movie_image::Model> {
        let model = movie_image::ActiveModel {
            id: Default::default(),
            image: Set(image.to_string()),
            uploaded: Set(now_sec()),
            movie_id: Set(movie_id),
            user_id: Set(user_id),
        };
        Ok(model.insert(&self.db).await?)
    }

    // Admin-side inserts. The catalog has a create-only lifecycle; there is
    // no editing or deletion through the app.

    pub async fn create_movie(
        &self,
        title: &str,
        plot: &str,
        year: i32,
        rating: Rating,
        runtime: i32,
        website: Option<&str>,
        director_id: Option<i32>,
    ) -> AppResult<movie::Model> {
        let model = movie::ActiveModel {
            id: Default::default(),
            title: Set(title.to_string()),
            plot: Set(plot.to_string()),
            year: Set(year),
            rating: Set(rating.as_code()),
            runtime: Set(runtime),
            website: Set(website.map(str::to_string)),
            director_id: Set(director_id),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn create_person(
        &self,
        first_name: &str,
        last_name: &str,
        born: &str,
        died: Option<&str>,
    ) -> AppResult<person::Model> {
        let model = person::ActiveModel {
            id: Default::default(),
            first_name: Set(first_name.to_string()),
            last_name: Set(last_name.to_string()),
            born: Set(born.to_string()),
            died: Set(died.map(str::to_string)),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn create_role(
        &self,
        movie_id: i32,
        person_id: i32,
        name: &str,
    ) -> AppResult<role::Model> {
        let model = role::ActiveModel {
            id: Default::default(),
            movie_id: Set(movie_id),
            person_id: Set(person_id),
            name: Set(name.to_string()),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn add_writer(&self, movie_id: i32, person_id: i32) -> AppResult<()> {
        let model = movie_writer::ActiveModel {
            id: Default::default(),
            movie_id: Set(movie_id),
            person_id: Set(person_id),
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    /// Movies in listing order, for admin dropdowns.
    pub async fn all_movies(&self) -> AppResult<Vec<movie::Model>> {
        let movies = movie::Entity::find()
            .order_by_desc(movie::Column::Year)
            .order_by_asc(movie::Column::Title)
            .all(&self.db)
            .await?;
        Ok(movies)
    }

    /// People in listing order (last name, first name), for admin dropdowns.
    pub async fn all_people(&self) -> AppResult<Vec<person::Model>> {
        let people = person::Entity::find()
            .order_by_asc(person::Column::LastName)
            .order_by_asc(person::Column::FirstName)
            .all(&self.db)
            .await?;
        Ok(people)
    }

    pub async fn counts(&self) -> AppResult<(u64, u64, u64)> {
        let movies = movie::Entity::find().count(&self.db).await?;
        let people = person::Entity::find().count(&self.db).await?;
        let votes = vote::Entity::find().count(&self.db).await?;
        Ok((movies, people, votes))
    }

    async fn people_by_ids(&self, ids: Vec<i32>) -> AppResult<HashMap<i32, person::Model>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let people = person::Entity::find()
            .filter(person::Column::Id.is_in(ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        Ok(people)
    }
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}
