//! In-memory copy of a slice of the One API dataset.
//!
//! Optional character attributes are `None` rather than empty so that the
//! `field` / `!field` existence filters have something to tell apart.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(rename = "_id")]
    pub id: String,
    pub chapter_name: String,
    pub book: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub runtime_in_minutes: u32,
    pub budget_in_millions: f64,
    pub box_office_revenue_in_millions: f64,
    pub academy_award_nominations: u32,
    pub academy_award_wins: u32,
    pub rotten_tomatoes_score: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub race: String,
    pub gender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spouse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiki_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename = "_id")]
    pub id: String,
    pub dialog: String,
    pub movie: String,
    pub character: String,
}

#[derive(Clone, Debug)]
pub struct Dataset {
    pub books: Vec<Book>,
    pub chapters: Vec<Chapter>,
    pub movies: Vec<Movie>,
    pub characters: Vec<Character>,
    pub quotes: Vec<Quote>,
}

pub const FELLOWSHIP_BOOK: &str = "5cf5805fb53e011a64671582";
pub const TOWERS_BOOK: &str = "5cf58077b53e011a64671583";
pub const RETURN_BOOK: &str = "5cf58080b53e011a64671584";

pub const TOWERS_MOVIE: &str = "5cd95395de30eff6ebccde5b";
pub const FELLOWSHIP_MOVIE: &str = "5cd95395de30eff6ebccde5c";
pub const RETURN_MOVIE: &str = "5cd95395de30eff6ebccde5d";

pub const GANDALF: &str = "5cd99d4bde30eff6ebccfea0";
pub const GOLLUM: &str = "5cd99d4bde30eff6ebccfe9e";

fn book(id: &str, name: &str) -> Book {
    Book {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn chapter(id: &str, chapter_name: &str, book: &str) -> Chapter {
    Chapter {
        id: id.to_string(),
        chapter_name: chapter_name.to_string(),
        book: book.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn movie(
    id: &str,
    name: &str,
    runtime: u32,
    budget: f64,
    box_office: f64,
    nominations: u32,
    wins: u32,
    rotten_tomatoes: f64,
) -> Movie {
    Movie {
        id: id.to_string(),
        name: name.to_string(),
        runtime_in_minutes: runtime,
        budget_in_millions: budget,
        box_office_revenue_in_millions: box_office,
        academy_award_nominations: nominations,
        academy_award_wins: wins,
        rotten_tomatoes_score: rotten_tomatoes,
    }
}

fn quote(id: &str, dialog: &str, movie: &str, character: &str) -> Quote {
    Quote {
        id: id.to_string(),
        dialog: dialog.to_string(),
        movie: movie.to_string(),
        character: character.to_string(),
    }
}

fn some(s: &str) -> Option<String> {
    Some(s.to_string())
}

impl Default for Dataset {
    fn default() -> Self {
        let books = vec![
            book(FELLOWSHIP_BOOK, "The Fellowship Of The Ring"),
            book(TOWERS_BOOK, "The Two Towers"),
            book(RETURN_BOOK, "The Return Of The King"),
        ];

        let chapters = vec![
            chapter("6091b6d6d58360f988133b8b", "A Long-expected Party", FELLOWSHIP_BOOK),
            chapter("6091b6d6d58360f988133b8c", "The Shadow of the Past", FELLOWSHIP_BOOK),
            chapter("6091b6d6d58360f988133ba1", "The Departure of Boromir", TOWERS_BOOK),
            chapter("6091b6d6d58360f988133ba2", "The Riders of Rohan", TOWERS_BOOK),
            chapter("6091b6d6d58360f988133bb7", "Minas Tirith", RETURN_BOOK),
            chapter("6091b6d6d58360f988133bc8", "The Grey Havens", RETURN_BOOK),
        ];

        let movies = vec![
            movie("5cd95395de30eff6ebccde56", "The Lord of the Rings Series", 558, 281.0, 2917.0, 30, 17, 94.0),
            movie("5cd95395de30eff6ebccde57", "The Hobbit Series", 462, 675.0, 2932.0, 7, 1, 66.33),
            movie("5cd95395de30eff6ebccde58", "The Unexpected Journey", 169, 200.0, 1021.0, 3, 1, 64.0),
            movie("5cd95395de30eff6ebccde59", "The Desolation of Smaug", 161, 217.0, 958.4, 3, 0, 75.0),
            movie("5cd95395de30eff6ebccde5a", "The Battle of the Five Armies", 144, 250.0, 956.0, 1, 0, 60.0),
            movie(TOWERS_MOVIE, "The Two Towers", 179, 94.0, 926.0, 6, 2, 96.0),
            movie(FELLOWSHIP_MOVIE, "The Fellowship of the Ring", 178, 93.0, 871.5, 13, 4, 91.0),
            movie(RETURN_MOVIE, "The Return of the King", 201, 94.0, 1120.0, 11, 11, 95.0),
        ];

        let characters = vec![
            Character {
                id: "5cd99d4bde30eff6ebccfbbe".to_string(),
                name: "Adanel".to_string(),
                race: "Human".to_string(),
                gender: "Female".to_string(),
                spouse: some("Belemir"),
                wiki_url: some("http://lotr.wikia.com//wiki/Adanel"),
                ..Character::default()
            },
            Character {
                id: "5cd99d4bde30eff6ebccfbe6".to_string(),
                name: "Aragorn II Elessar".to_string(),
                race: "Human".to_string(),
                gender: "Male".to_string(),
                hair: some("Dark"),
                realm: some("Reunited Kingdom,Arnor,Gondor"),
                spouse: some("Arwen"),
                height: some("198cm (6'6\")"),
                wiki_url: some("http://lotr.wikia.com//wiki/Aragorn_II_Elessar"),
            },
            Character {
                id: "5cd99d4bde30eff6ebccfc7e".to_string(),
                name: "Elrond".to_string(),
                race: "Half-elven".to_string(),
                gender: "Male".to_string(),
                hair: some("Dark"),
                realm: some("Rivendell"),
                spouse: some("Celebrían"),
                wiki_url: some("http://lotr.wikia.com//wiki/Elrond"),
                ..Character::default()
            },
            Character {
                id: "5cd99d4bde30eff6ebccfc15".to_string(),
                name: "Frodo Baggins".to_string(),
                race: "Hobbit".to_string(),
                gender: "Male".to_string(),
                hair: some("Brown"),
                realm: some("Shire"),
                height: some("1.06m (3'6\")"),
                wiki_url: some("http://lotr.wikia.com//wiki/Frodo_Baggins"),
                ..Character::default()
            },
            Character {
                id: GANDALF.to_string(),
                name: "Gandalf".to_string(),
                race: "Maiar".to_string(),
                gender: "Male".to_string(),
                hair: some("Grey, later white"),
                wiki_url: some("http://lotr.wikia.com//wiki/Gandalf"),
                ..Character::default()
            },
            Character {
                id: GOLLUM.to_string(),
                name: "Gollum".to_string(),
                race: "Hobbit".to_string(),
                gender: "Male".to_string(),
                height: some("1.09m (3'7\")"),
                wiki_url: some("http://lotr.wikia.com//wiki/Gollum"),
                ..Character::default()
            },
            Character {
                id: "5cdbdecb6dc0baeae48cfac1".to_string(),
                name: "Lugdush".to_string(),
                race: "Uruk-hai".to_string(),
                gender: "Male".to_string(),
                hair: some("Dark"),
                height: some("6'1 (film)"),
                ..Character::default()
            },
            Character {
                id: "5cd99d4bde30eff6ebccfe19".to_string(),
                name: "Théoden".to_string(),
                race: "Human".to_string(),
                gender: "Male".to_string(),
                hair: some("Blond"),
                realm: some("Rohan"),
                spouse: some("Elfhild"),
                wiki_url: some("http://lotr.wikia.com//wiki/Th%C3%A9oden"),
                ..Character::default()
            },
        ];

        let quotes = vec![
            quote("5cd96e05de30eff6ebcce7e9", "Deagol!", RETURN_MOVIE, GOLLUM),
            quote("5cd96e05de30eff6ebcce7ec", "Give us that, Deagol my love.", RETURN_MOVIE, GOLLUM),
            quote(
                "5cd96e05de30eff6ebccebd0",
                "Get the wounded on horses. The wolves of Isengard will return. Leave the dead.",
                TOWERS_MOVIE,
                "5cd99d4bde30eff6ebccfe19",
            ),
            quote("5cd96e05de30eff6ebccec0e", "My precious.", TOWERS_MOVIE, GOLLUM),
            quote("5cd96e05de30eff6ebcce84c", "You shall not pass!", FELLOWSHIP_MOVIE, GANDALF),
            quote(
                "5cd96e05de30eff6ebcce8a1",
                "All we have to decide is what to do with the time that is given us.",
                FELLOWSHIP_MOVIE,
                GANDALF,
            ),
            quote(
                "5cd96e05de30eff6ebccee8b",
                "I will take the Ring to Mordor.",
                FELLOWSHIP_MOVIE,
                "5cd99d4bde30eff6ebccfc15",
            ),
        ];

        Self {
            books,
            chapters,
            movies,
            characters,
            quotes,
        }
    }
}
