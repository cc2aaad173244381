use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, html};

use crate::entities::{movie, movie_image, person, user};
use crate::media;
use crate::models::{
    MovieCredits, MovieWithScore, PersonCredits, Rating, UserVote, VoteValue, person_headline,
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub fn home_page(viewer: Option<&user::Model>) -> String {
    page(
        "ReelVault",
        viewer,
        html! {
            div class="bg-white shadow rounded-lg p-8" {
                h1 class="text-3xl font-bold text-gray-900" { "ReelVault" }
                p class="mt-2 text-gray-600" { "Browse the catalog, look up cast and crew, and vote for the movies you love." }
                div class="mt-8 flex gap-4" {
                    a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/movies" { "Browse movies" }
                    a class="rounded-md border border-gray-300 px-4 py-2 font-semibold text-gray-700 hover:bg-gray-100" href="/movies/top" { "Top 10" }
                }
            }
        },
    )
}

pub fn movie_list_page(
    viewer: Option<&user::Model>,
    movies: &[MovieWithScore],
    page_number: u64,
    total_pages: u64,
) -> String {
    page(
        "Movies",
        viewer,
        html! {
            h1 class="text-3xl font-bold text-gray-900" { "Movies" }

            @if movies.is_empty() {
                div class="mt-8 bg-white shadow rounded-lg p-8" {
                    p class="text-gray-600" { "Nothing in the catalog yet." }
                }
            } @else {
                div class="mt-8 space-y-4" {
                    @for m in movies {
                        (movie_card(m))
                    }
                }
            }

            div class="mt-8 flex items-center justify-between text-sm" {
                @if page_number > 1 {
                    a class="text-blue-600 hover:text-blue-800" href=(format!("/movies?page={}", page_number - 1)) { "← Previous" }
                } @else {
                    span {}
                }
                span class="text-gray-500" { "Page " (page_number) " of " (total_pages.max(1)) }
                @if page_number < total_pages {
                    a class="text-blue-600 hover:text-blue-800" href=(format!("/movies?page={}", page_number + 1)) { "Next →" }
                } @else {
                    span {}
                }
            }
        },
    )
}

pub fn top_movies_page(viewer: Option<&user::Model>, movies: &[MovieWithScore]) -> String {
    page(
        "Top movies",
        viewer,
        html! {
            h1 class="text-3xl font-bold text-gray-900" { "Top movies" }
            p class="mt-2 text-gray-600" { "Ranked by total votes." }

            @if movies.is_empty() {
                div class="mt-8 bg-white shadow rounded-lg p-8" {
                    p class="text-gray-600" { "No votes have been cast yet." }
                }
            } @else {
                ol class="mt-8 space-y-4" {
                    @for (i, m) in movies.iter().enumerate() {
                        li class="bg-white shadow rounded-lg p-6 flex items-center gap-6" {
                            span class="text-2xl font-bold text-gray-400 w-8" { (i + 1) }
                            div class="flex-1" {
                                a class="text-xl font-semibold text-gray-900 hover:text-blue-700" href=(format!("/movie/{}", m.id)) { (m.headline()) }
                            }
                            (score_badge(m.score))
                        }
                    }
                }
            }
        },
    )
}

pub fn movie_detail_page(
    viewer: Option<&user::Model>,
    credits: &MovieCredits,
    images: &[movie_image::Model],
    my_vote: Option<&UserVote>,
) -> String {
    let m = &credits.movie;
    page(
        &m.headline(),
        viewer,
        html! {
            div class="bg-white shadow rounded-lg p-8" {
                div class="flex items-start justify-between gap-4" {
                    div {
                        h1 class="text-3xl font-bold text-gray-900" { (m.headline()) }
                        p class="mt-1 text-sm text-gray-500" {
                            (m.rating_label()) " · " (m.runtime) " min"
                            @if let Some(site) = &m.website {
                                " · " a class="text-blue-600 hover:text-blue-800" href=(site) target="_blank" rel="noopener noreferrer" { "Website" }
                            }
                        }
                    }
                    (score_badge(m.score))
                }

                p class="mt-6 text-gray-700" { (m.plot) }

                div class="mt-8 grid gap-6 md:grid-cols-3" {
                    div {
                        h2 class="text-sm font-semibold text-gray-700" { "Director" }
                        @if let Some(d) = &credits.director {
                            (person_link(d))
                        } @else {
                            p class="mt-2 text-sm text-gray-500" { "—" }
                        }
                    }
                    div {
                        h2 class="text-sm font-semibold text-gray-700" { "Writers" }
                        @if credits.writers.is_empty() {
                            p class="mt-2 text-sm text-gray-500" { "—" }
                        } @else {
                            ul class="mt-2 space-y-1" {
                                @for w in &credits.writers { li { (person_link(w)) } }
                            }
                        }
                    }
                    div {
                        h2 class="text-sm font-semibold text-gray-700" { "Cast" }
                        @if credits.cast.is_empty() {
                            p class="mt-2 text-sm text-gray-500" { "—" }
                        } @else {
                            ul class="mt-2 space-y-1" {
                                @for c in &credits.cast {
                                    li class="text-sm text-gray-700" {
                                        span class="font-medium" { (c.role_name) } " — " (person_link(&c.person))
                                    }
                                }
                            }
                        }
                    }
                }
            }

            @if let Some(vote) = my_vote {
                (vote_form(vote))
            } @else {
                div class="mt-6 bg-white shadow rounded-lg p-6" {
                    p class="text-sm text-gray-600" {
                        a class="text-blue-600 hover:text-blue-800" href=(format!("/user/login?next=/movie/{}", m.id)) { "Sign in" }
                        " to vote or upload images."
                    }
                }
            }

            div class="mt-6 bg-white shadow rounded-lg p-6" {
                h2 class="text-sm font-semibold text-gray-700" { "Images" }
                @if images.is_empty() {
                    p class="mt-2 text-sm text-gray-500" { "No images yet." }
                } @else {
                    div class="mt-4 grid grid-cols-2 gap-4 md:grid-cols-4" {
                        @for img in images {
                            img class="rounded-md shadow" src=(media::media_url(&img.image)) alt=(m.title);
                        }
                    }
                }

                @if viewer.is_some() {
                    form class="mt-6 flex items-center gap-4" method="post" action=(format!("/movie/{}/image", m.id)) enctype="multipart/form-data" {
                        input class="text-sm text-gray-700" type="file" name="image" required;
                        button class="rounded-md bg-blue-600 px-4 py-2 text-sm font-semibold text-white hover:bg-blue-700" type="submit" { "Upload" }
                    }
                }
            }
        },
    )
}

pub fn person_detail_page(viewer: Option<&user::Model>, credits: &PersonCredits) -> String {
    let p = &credits.person;
    page(
        &person_headline(p),
        viewer,
        html! {
            div class="bg-white shadow rounded-lg p-8" {
                h1 class="text-3xl font-bold text-gray-900" { (person_headline(p)) }

                div class="mt-8 grid gap-6 md:grid-cols-3" {
                    div {
                        h2 class="text-sm font-semibold text-gray-700" { "Directed" }
                        (movie_link_list(&credits.directed))
                    }
                    div {
                        h2 class="text-sm font-semibold text-gray-700" { "Wrote" }
                        (movie_link_list(&credits.wrote))
                    }
                    div {
                        h2 class="text-sm font-semibold text-gray-700" { "Acted" }
                        @if credits.acted.is_empty() {
                            p class="mt-2 text-sm text-gray-500" { "—" }
                        } @else {
                            ul class="mt-2 space-y-1" {
                                @for credit in &credits.acted {
                                    li class="text-sm text-gray-700" {
                                        span class="font-medium" { (credit.role_name) } " in "
                                        a class="text-blue-600 hover:text-blue-800" href=(format!("/movie/{}", credit.movie.id)) {
                                            (credit.movie.title) " (" (credit.movie.year) ")"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn login_page(error: Option<&str>, next: Option<&str>) -> String {
    page(
        "Sign in",
        None,
        html! {
            div class="max-w-md mx-auto bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { "Sign in" }
                (form_error(error))
                form class="mt-6 space-y-4" method="post" action="/user/login" {
                    @if let Some(next) = next {
                        input type="hidden" name="next" value=(next);
                    }
                    (text_field("username", "Username", "text"))
                    (text_field("password", "Password", "password"))
                    button class="w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Sign in" }
                }
                p class="mt-4 text-sm text-gray-600" {
                    "No account? " a class="text-blue-600 hover:text-blue-800" href="/user/register" { "Register" }
                }
            }
        },
    )
}

pub fn register_page(error: Option<&str>) -> String {
    page(
        "Register",
        None,
        html! {
            div class="max-w-md mx-auto bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { "Register" }
                (form_error(error))
                form class="mt-6 space-y-4" method="post" action="/user/register" {
                    (text_field("username", "Username", "text"))
                    (text_field("password", "Password", "password"))
                    button class="w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Create account" }
                }
            }
        },
    )
}

pub fn admin_page(viewer: Option<&user::Model>, movies: u64, people: u64, votes: u64) -> String {
    page(
        "Admin",
        viewer,
        html! {
            h1 class="text-3xl font-bold text-gray-900" { "Admin" }
            div class="mt-8 grid gap-4 md:grid-cols-3" {
                (stat_card("Movies", movies))
                (stat_card("People", people))
                (stat_card("Votes", votes))
            }
            div class="mt-8 flex gap-4" {
                a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/admin/movie" { "New movie" }
                a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/admin/person" { "New person" }
                a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/admin/role" { "New credit" }
            }
        },
    )
}

pub fn admin_movie_page(
    viewer: Option<&user::Model>,
    people: &[person::Model],
    error: Option<&str>,
) -> String {
    page(
        "New movie",
        viewer,
        html! {
            div class="max-w-xl mx-auto bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { "New movie" }
                (form_error(error))
                form class="mt-6 space-y-4" method="post" action="/admin/movie" {
                    (text_field("title", "Title", "text"))
                    div {
                        label class="block text-sm font-medium text-gray-700" for="plot" { "Plot" }
                        textarea class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name="plot" id="plot" rows="4" {}
                    }
                    (text_field("year", "Year", "number"))
                    div {
                        label class="block text-sm font-medium text-gray-700" for="rating" { "Rating" }
                        select class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name="rating" id="rating" {
                            @for rating in Rating::ALL {
                                option value=(rating.as_code()) { (rating.label()) }
                            }
                        }
                    }
                    (text_field("runtime", "Runtime (minutes)", "number"))
                    (text_field("website", "Website (optional)", "text"))
                    div {
                        label class="block text-sm font-medium text-gray-700" for="director_id" { "Director" }
                        select class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name="director_id" id="director_id" {
                            option value="" { "—" }
                            @for p in people {
                                option value=(p.id) { (person_headline(p)) }
                            }
                        }
                    }
                    button class="w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Create" }
                }
            }
        },
    )
}

pub fn admin_person_page(viewer: Option<&user::Model>, error: Option<&str>) -> String {
    page(
        "New person",
        viewer,
        html! {
            div class="max-w-xl mx-auto bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { "New person" }
                (form_error(error))
                form class="mt-6 space-y-4" method="post" action="/admin/person" {
                    (text_field("first_name", "First name", "text"))
                    (text_field("last_name", "Last name", "text"))
                    (text_field("born", "Born (YYYY-MM-DD)", "text"))
                    (text_field("died", "Died (YYYY-MM-DD, optional)", "text"))
                    button class="w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Create" }
                }
            }
        },
    )
}

pub fn admin_credit_page(
    viewer: Option<&user::Model>,
    movies: &[movie::Model],
    people: &[person::Model],
    error: Option<&str>,
) -> String {
    page(
        "New credit",
        viewer,
        html! {
            div class="max-w-xl mx-auto bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { "New credit" }
                p class="mt-2 text-sm text-gray-600" { "Attach a person to a movie as a named role or a writing credit." }
                (form_error(error))
                form class="mt-6 space-y-4" method="post" action="/admin/role" {
                    div {
                        label class="block text-sm font-medium text-gray-700" for="movie_id" { "Movie" }
                        select class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name="movie_id" id="movie_id" {
                            @for m in movies {
                                option value=(m.id) { (m.title) " (" (m.year) ")" }
                            }
                        }
                    }
                    div {
                        label class="block text-sm font-medium text-gray-700" for="person_id" { "Person" }
                        select class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name="person_id" id="person_id" {
                            @for p in people {
                                option value=(p.id) { (person_headline(p)) }
                            }
                        }
                    }
                    div {
                        label class="block text-sm font-medium text-gray-700" for="credit" { "Credit" }
                        select class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name="credit" id="credit" {
                            option value="actor" { "Actor (named role)" }
                            option value="writer" { "Writer" }
                        }
                    }
                    (text_field("name", "Role name (actors only)", "text"))
                    button class="w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { "Create" }
                }
            }
        },
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    page(
        title,
        None,
        html! {
            div class="max-w-xl mx-auto bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { (status.as_u16()) " " (title) }
                p class="mt-4 text-gray-700" { (message) }
                a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back to home" }
            }
        },
    )
}

fn page(title: &str, viewer: Option<&user::Model>, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " · ReelVault" }
                script src=(TAILWIND_CDN) {}
            }
            body class="min-h-screen bg-gray-50" {
                (nav_bar(viewer))
                div class="max-w-4xl mx-auto px-6 py-10" { (body) }
            }
        }
    }
    .into_string()
}

fn nav_bar(viewer: Option<&user::Model>) -> Markup {
    html! {
        nav class="bg-white shadow" {
            div class="max-w-4xl mx-auto px-6 py-4 flex items-center justify-between" {
                div class="flex items-center gap-6" {
                    a class="font-bold text-gray-900" href="/" { "ReelVault" }
                    a class="text-sm text-gray-600 hover:text-gray-900" href="/movies" { "Movies" }
                    a class="text-sm text-gray-600 hover:text-gray-900" href="/movies/top" { "Top 10" }
                }
                div class="flex items-center gap-4 text-sm" {
                    @if let Some(user) = viewer {
                        @if user.is_staff {
                            a class="text-gray-600 hover:text-gray-900" href="/admin" { "Admin" }
                        }
                        span class="text-gray-500" { (user.username) }
                        form method="post" action="/user/logout" {
                            button class="text-blue-600 hover:text-blue-800" type="submit" { "Sign out" }
                        }
                    } @else {
                        a class="text-blue-600 hover:text-blue-800" href="/user/login" { "Sign in" }
                        a class="text-blue-600 hover:text-blue-800" href="/user/register" { "Register" }
                    }
                }
            }
        }
    }
}

fn movie_card(m: &MovieWithScore) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-6 flex items-start justify-between gap-4" {
            div {
                a class="text-xl font-semibold text-gray-900 hover:text-blue-700" href=(format!("/movie/{}", m.id)) { (m.headline()) }
                p class="mt-1 text-sm text-gray-500" { (m.rating_label()) " · " (m.runtime) " min" }
            }
            (score_badge(m.score))
        }
    }
}

fn score_badge(score: Option<i64>) -> Markup {
    html! {
        @if let Some(s) = score {
            @if s > 0 {
                span class="rounded-full bg-green-100 px-3 py-1 text-sm font-semibold text-green-800" { "+" (s) }
            } @else if s < 0 {
                span class="rounded-full bg-red-100 px-3 py-1 text-sm font-semibold text-red-800" { (s) }
            } @else {
                span class="rounded-full bg-gray-100 px-3 py-1 text-sm font-semibold text-gray-700" { (s) }
            }
        } @else {
            span class="rounded-full bg-gray-100 px-3 py-1 text-sm text-gray-500" { "no votes" }
        }
    }
}

fn vote_form(vote: &UserVote) -> Markup {
    let current = vote.value();
    html! {
        div class="mt-6 bg-white shadow rounded-lg p-6" {
            h2 class="text-sm font-semibold text-gray-700" { "Your vote" }
            form class="mt-4 flex items-center gap-6" method="post" action=(vote.form_action()) {
                @for value in [VoteValue::Up, VoteValue::Down] {
                    label class="flex items-center gap-2 text-sm text-gray-700" {
                        input type="radio" name="value" value=(value.as_code()) checked[current == Some(value)] required;
                        (value.label())
                    }
                }
                button class="rounded-md bg-blue-600 px-4 py-2 text-sm font-semibold text-white hover:bg-blue-700" type="submit" { "Vote" }
            }
        }
    }
}

fn person_link(p: &person::Model) -> Markup {
    html! {
        a class="text-sm text-blue-600 hover:text-blue-800" href=(format!("/person/{}", p.id)) { (person_headline(p)) }
    }
}

fn movie_link_list(movies: &[movie::Model]) -> Markup {
    html! {
        @if movies.is_empty() {
            p class="mt-2 text-sm text-gray-500" { "—" }
        } @else {
            ul class="mt-2 space-y-1" {
                @for m in movies {
                    li {
                        a class="text-sm text-blue-600 hover:text-blue-800" href=(format!("/movie/{}", m.id)) {
                            (m.title) " (" (m.year) ")"
                        }
                    }
                }
            }
        }
    }
}

fn text_field(name: &str, label: &str, kind: &str) -> Markup {
    html! {
        div {
            label class="block text-sm font-medium text-gray-700" for=(name) { (label) }
            input class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500" type=(kind) name=(name) id=(name);
        }
    }
}

fn form_error(error: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = error {
            div class="mt-4 rounded-md bg-red-50 border border-red-200 px-4 py-3 text-sm text-red-700" { (message) }
        }
    }
}

fn stat_card(label: &str, count: u64) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-6" {
            p class="text-sm text-gray-500" { (label) }
            p class="mt-1 text-2xl font-bold text-gray-900" { (count) }
        }
    }
}
