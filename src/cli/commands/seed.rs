use anyhow::bail;
use serde::Serialize;
use std::fmt;

use crate::database::models::MovieChanges;
use crate::database::{movies, ratings, users, Database};

struct SeedUser {
    name: &'static str,
    email: &'static str,
    password: &'static str,
}

struct SeedMovie {
    title: &'static str,
    description: &'static str,
    director: &'static str,
    year: i64,
    genre: &'static str,
    owner: usize,
}

/// (movie index, user index, score, comment)
type SeedRating = (usize, usize, f64, &'static str);

const USERS: [SeedUser; 2] = [
    SeedUser { name: "João Silva", email: "joao@example.com", password: "senha123" },
    SeedUser { name: "Maria Santos", email: "maria@example.com", password: "senha456" },
];

const MOVIES: [SeedMovie; 4] = [
    SeedMovie {
        title: "Homem-Aranha: Longe de Casa",
        description: "Peter Parker se vê envolvido em uma aventura internacional enquanto tenta conciliar sua vida pessoal com suas responsabilidades como Homem-Aranha.",
        director: "Jon Watts",
        year: 2021,
        genre: "Ação",
        owner: 0,
    },
    SeedMovie {
        title: "Interestelar",
        description: "Uma equipe de astronautas viaja através de um buraco de minhoca perto de Saturno para garantir a sobrevivência da humanidade.",
        director: "Christopher Nolan",
        year: 2014,
        genre: "Ficção Científica",
        owner: 0,
    },
    SeedMovie {
        title: "O Poderoso Chefão",
        description: "O envelhecido patriarca de uma dinastia do crime organizado transfere o controle de seu negócio para seu filho mais jovem.",
        director: "Francis Ford Coppola",
        year: 1972,
        genre: "Drama",
        owner: 1,
    },
    SeedMovie {
        title: "Inception",
        description: "Um ladrão que rouba segredos corporativos através de tecnologia de sonho compartilhado é oferecido um contrato para fazer o impossível.",
        director: "Christopher Nolan",
        year: 2010,
        genre: "Ficção Científica/Thriller",
        owner: 1,
    },
];

const RATINGS: [SeedRating; 6] = [
    (0, 0, 8.0, "Muito bom! Efeitos visuais incríveis."),
    (0, 1, 9.0, "Excelente filme, superou minhas expectativas!"),
    (1, 1, 10.0, "Uma das melhores obras de ficção científica jamais criadas."),
    (1, 0, 9.0, "Cinematografia impecável e trilha sonora épica."),
    (2, 0, 10.0, "Clássico absoluto do cinema."),
    (3, 0, 9.5, "Mente insana, roteiro perfeito."),
];

#[derive(Debug, Serialize)]
pub struct SeedSummary {
    pub users: usize,
    pub movies: usize,
    pub ratings: usize,
    pub logins: Vec<(String, String)>,
}

impl fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Seed complete:")?;
        writeln!(f, "  - {} users", self.users)?;
        writeln!(f, "  - {} movies", self.movies)?;
        writeln!(f, "  - {} ratings", self.ratings)?;
        writeln!(f)?;
        write!(f, "Sample logins:")?;
        for (email, password) in &self.logins {
            write!(f, "\n  Email: {} | Senha: {}", email, password)?;
        }
        Ok(())
    }
}

/// Insert the sample data set. Refuses to run against a database that
/// already has users, so it never mixes with real data.
pub async fn handle(db: &Database, bcrypt_cost: u32) -> anyhow::Result<SeedSummary> {
    if !users::list(db).await?.is_empty() {
        bail!("database already contains users; seed only runs on an empty database");
    }

    let mut user_ids = Vec::with_capacity(USERS.len());
    for user in &USERS {
        user_ids.push(users::create(db, user.name, user.email, user.password, bcrypt_cost).await?);
    }
    tracing::info!("Seeded {} users", user_ids.len());

    let mut movie_ids = Vec::with_capacity(MOVIES.len());
    for movie in &MOVIES {
        let changes = MovieChanges {
            title: movie.title.to_string(),
            description: Some(movie.description.to_string()),
            director: movie.director.to_string(),
            release_year: Some(movie.year),
            genre: Some(movie.genre.to_string()),
        };
        movie_ids.push(movies::create(db, &changes, user_ids[movie.owner]).await?);
    }
    tracing::info!("Seeded {} movies", movie_ids.len());

    for &(movie, user, score, comment) in &RATINGS {
        ratings::create(db, movie_ids[movie], user_ids[user], score, comment).await?;
    }
    for &movie_id in &movie_ids {
        movies::recompute_rating(db, movie_id).await?;
    }
    tracing::info!("Seeded {} ratings", RATINGS.len());

    Ok(SeedSummary {
        users: USERS.len(),
        movies: MOVIES.len(),
        ratings: RATINGS.len(),
        logins: USERS
            .iter()
            .map(|u| (u.email.to_string(), u.password.to_string()))
            .collect(),
    })
}
