use crate::error::{Error, Result};
use crate::model::*;
use serde::de::DeserializeOwned;
use sled::transaction::{abort, TransactionError, TransactionResult, Transactional};

fn serialize_id(id: u64) -> [u8; 8] {
    id.to_le_bytes()
}

fn deserialize_id<V: AsRef<[u8]>>(id: V) -> Result<u64> {
    let bytes = id.as_ref();
    bytes
        .try_into()
        .map(u64::from_le_bytes)
        .map_err(|_| Error::Corrupt(format!("id of length {}", bytes.len())))
}

/// `outer ++ inner`, so that a prefix scan over `outer` lists every `inner`.
fn compound_key(outer: u64, inner: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&serialize_id(outer));
    key[8..].copy_from_slice(&serialize_id(inner));
    key
}

fn inner_id<V: AsRef<[u8]>>(key: V) -> Result<u64> {
    let key = key.as_ref();
    if key.len() != 16 {
        return Err(Error::Corrupt(format!("compound key of length {}", key.len())));
    }
    deserialize_id(&key[8..])
}

fn decode<T: DeserializeOwned, V: AsRef<[u8]>>(data: V) -> Result<T> {
    Ok(bincode::deserialize(data.as_ref())?)
}

fn decode_all<T: DeserializeOwned>(tree: &sled::Tree) -> Result<Vec<(u64, T)>> {
    let mut entries = tree
        .iter()
        .map(|entry| -> Result<(u64, T)> {
            let (key, value) = entry?;
            Ok((deserialize_id(key)?, decode(value)?))
        })
        .collect::<Result<Vec<_>>>()?;
    // Little-endian keys do not iterate in numeric order.
    entries.sort_by_key(|(id, _)| *id);
    Ok(entries)
}

fn storage_error(err: TransactionError<()>) -> Error {
    match err {
        TransactionError::Storage(e) => e.into(),
        TransactionError::Abort(()) => Error::Corrupt("transaction aborted".to_owned()),
    }
}

pub trait UserDb {
    /// Returns `None` if the username is taken.
    fn add_user(&self, user: &User) -> Result<Option<u64>>;
    fn get_user(&self, id: u64) -> Result<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<(u64, User)>>;
}

pub trait CatalogDb {
    fn add_genre(&self, genre: &Genre) -> Result<u64>;
    fn get_genre(&self, id: u64) -> Result<Option<Genre>>;
    fn genres(&self) -> Result<Vec<(u64, Genre)>>;
    fn add_movie(&self, movie: &Movie) -> Result<u64>;
    fn get_movie(&self, id: u64) -> Result<Option<Movie>>;
    fn movies(&self) -> Result<Vec<(u64, Movie)>>;
    fn movies_by_genre(&self, genre_id: u64) -> Result<Vec<(u64, Movie)>>;
}

/// Per-user saved titles, kept in the order they were added.
pub trait MyListDb {
    /// Returns `false` if the title was already saved.
    fn add_to_list(&self, user_id: u64, movie_id: u64) -> Result<bool>;
    /// Returns `false` if the title was not saved.
    fn remove_from_list(&self, user_id: u64, movie_id: u64) -> Result<bool>;
    fn in_list(&self, user_id: u64, movie_id: u64) -> Result<bool>;
    fn list(&self, user_id: u64) -> Result<Vec<u64>>;
}

const USERS: &[u8] = b"users";
const USERS_USERNAME: &[u8] = b"users_username";
const GENRES: &[u8] = b"genres";
const MOVIES: &[u8] = b"movies";
const MOVIES_GENRE: &[u8] = b"movies_genre";
const MY_LIST: &[u8] = b"my_list";

impl UserDb for sled::Db {
    fn add_user(&self, user: &User) -> Result<Option<u64>> {
        let users = self.open_tree(USERS)?;
        let users_username = self.open_tree(USERS_USERNAME)?;
        let id = self.generate_id()?;
        let key = serialize_id(id);
        let encoded = bincode::serialize(user)?;
        let result: TransactionResult<(), ()> =
            (&users, &users_username).transaction(|(users, users_username)| {
                if users_username.get(user.username.as_bytes())?.is_some() {
                    return abort(());
                }
                users.insert(&key[..], encoded.as_slice())?;
                users_username.insert(user.username.as_bytes(), &key[..])?;
                Ok(())
            });
        match result {
            Ok(()) => Ok(Some(id)),
            Err(TransactionError::Abort(())) => Ok(None),
            Err(TransactionError::Storage(e)) => Err(e.into()),
        }
    }

    fn get_user(&self, id: u64) -> Result<Option<User>> {
        let users = self.open_tree(USERS)?;
        users.get(serialize_id(id))?.map(decode).transpose()
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<(u64, User)>> {
        let users_username = self.open_tree(USERS_USERNAME)?;
        let users = self.open_tree(USERS)?;
        if let Some(id) = users_username.get(username)? {
            let data = users
                .get(&id)?
                .ok_or_else(|| Error::Corrupt(format!("bad index users_username: {}", username)))?;
            Ok(Some((deserialize_id(id)?, decode(data)?)))
        } else {
            Ok(None)
        }
    }
}

impl CatalogDb for sled::Db {
    fn add_genre(&self, genre: &Genre) -> Result<u64> {
        let genres = self.open_tree(GENRES)?;
        let id = self.generate_id()?;
        genres.insert(&serialize_id(id)[..], bincode::serialize(genre)?)?;
        Ok(id)
    }

    fn get_genre(&self, id: u64) -> Result<Option<Genre>> {
        let genres = self.open_tree(GENRES)?;
        genres.get(serialize_id(id))?.map(decode).transpose()
    }

    fn genres(&self) -> Result<Vec<(u64, Genre)>> {
        decode_all(&self.open_tree(GENRES)?)
    }

    fn add_movie(&self, movie: &Movie) -> Result<u64> {
        let movies = self.open_tree(MOVIES)?;
        let movies_genre = self.open_tree(MOVIES_GENRE)?;
        let id = self.generate_id()?;
        let key = serialize_id(id);
        let encoded = bincode::serialize(movie)?;
        (&movies, &movies_genre)
            .transaction(|(movies, movies_genre)| {
                movies.insert(&key[..], encoded.as_slice())?;
                for genre_id in &movie.genres {
                    movies_genre.insert(&compound_key(*genre_id, id)[..], Vec::<u8>::new())?;
                }
                Ok(())
            })
            .map_err(storage_error)?;
        Ok(id)
    }

    fn get_movie(&self, id: u64) -> Result<Option<Movie>> {
        let movies = self.open_tree(MOVIES)?;
        movies.get(serialize_id(id))?.map(decode).transpose()
    }

    fn movies(&self) -> Result<Vec<(u64, Movie)>> {
        decode_all(&self.open_tree(MOVIES)?)
    }

    fn movies_by_genre(&self, genre_id: u64) -> Result<Vec<(u64, Movie)>> {
        let movies_genre = self.open_tree(MOVIES_GENRE)?;
        let mut ids = movies_genre
            .scan_prefix(serialize_id(genre_id))
            .keys()
            .map(|key| -> Result<u64> { inner_id(key?) })
            .collect::<Result<Vec<_>>>()?;
        ids.sort_unstable();
        ids.into_iter()
            .map(|id| -> Result<(u64, Movie)> {
                let movie = self
                    .get_movie(id)?
                    .ok_or_else(|| Error::Corrupt(format!("bad index movies_genre: {}", id)))?;
                Ok((id, movie))
            })
            .collect()
    }
}

impl MyListDb for sled::Db {
    fn add_to_list(&self, user_id: u64, movie_id: u64) -> Result<bool> {
        let my_list = self.open_tree(MY_LIST)?;
        let key = compound_key(user_id, movie_id);
        if my_list.contains_key(key)? {
            return Ok(false);
        }
        let added = self.generate_id()?;
        let previous = my_list.insert(&key[..], &serialize_id(added)[..])?;
        Ok(previous.is_none())
    }

    fn remove_from_list(&self, user_id: u64, movie_id: u64) -> Result<bool> {
        let my_list = self.open_tree(MY_LIST)?;
        Ok(my_list.remove(compound_key(user_id, movie_id))?.is_some())
    }

    fn in_list(&self, user_id: u64, movie_id: u64) -> Result<bool> {
        let my_list = self.open_tree(MY_LIST)?;
        Ok(my_list.contains_key(compound_key(user_id, movie_id))?)
    }

    fn list(&self, user_id: u64) -> Result<Vec<u64>> {
        let my_list = self.open_tree(MY_LIST)?;
        let mut entries = my_list
            .scan_prefix(serialize_id(user_id))
            .map(|entry| -> Result<(u64, u64)> {
                let (key, added) = entry?;
                Ok((deserialize_id(added)?, inner_id(key)?))
            })
            .collect::<Result<Vec<_>>>()?;
        entries.sort_unstable();
        Ok(entries.into_iter().map(|(_, movie_id)| movie_id).collect())
    }
}
