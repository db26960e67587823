mod metadata;
mod movie;

pub use metadata::{
    CastMember, MovieMetadata, TmdbCastEntry, TmdbCredits, TmdbCrewEntry, TmdbGenre,
    TmdbMovieDetails, TmdbVideo, TmdbVideos,
};
pub use movie::{Movie, MovieId, Rating, Recommendation, RecommendationResult};
