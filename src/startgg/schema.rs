//! Response shapes returned by the start.gg GraphQL API.
//!
//! Only the fields our query documents select are modelled. Nearly
//! everything is optional because start.gg nulls out fields freely
//! (unpublished standings, deleted users, teams without participants).

use serde::Deserialize;

use crate::models::SourceId;

/// GraphQL envelope: `data` and/or `errors`.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// Paginated list wrapper (`{ nodes: [...] }`).
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub nodes: Option<Vec<T>>,
}

impl<T> Connection<T> {
    pub fn into_nodes(self) -> Vec<T> {
        self.nodes.unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct TournamentsData {
    pub tournaments: Option<Connection<RawTournament>>,
}

#[derive(Debug, Deserialize)]
pub struct VideogamesData {
    pub videogames: Option<Connection<Videogame>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTournament {
    pub id: SourceId,
    #[serde(default)]
    pub name: String,
    pub slug: Option<String>,
    pub start_at: Option<i64>,
    pub end_at: Option<i64>,
    pub num_attendees: Option<u32>,
    pub events: Option<Vec<RawEvent>>,
}

impl RawTournament {
    pub fn events(&self) -> &[RawEvent] {
        self.events.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub id: SourceId,
    #[serde(default)]
    pub name: String,
    pub videogame: Option<Videogame>,
    pub standings: Option<Connection<RawStanding>>,
}

impl RawEvent {
    pub fn standings(&self) -> &[RawStanding] {
        self.standings
            .as_ref()
            .and_then(|c| c.nodes.as_deref())
            .unwrap_or_default()
    }

    pub fn is_for_game(&self, videogame_id: &SourceId) -> bool {
        self.videogame.as_ref().is_some_and(|v| &v.id == videogame_id)
    }

    pub fn game_name(&self) -> Option<&str> {
        self.videogame.as_ref().and_then(|v| v.name.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Videogame {
    pub id: SourceId,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStanding {
    pub placement: Option<u32>,
    pub entrant: Option<Entrant>,
}

impl RawStanding {
    /// Entrant name as shown on the bracket.
    pub fn entrant_name(&self) -> Option<&str> {
        self.entrant
            .as_ref()
            .and_then(|e| e.name.as_deref())
            .filter(|n| !n.trim().is_empty())
    }

    fn participant(&self) -> Option<&Participant> {
        self.entrant
            .as_ref()
            .and_then(|e| e.participants.as_ref())
            .and_then(|p| p.first())
    }

    /// Player display name: gamer tag, then account name, then entrant name.
    pub fn display_name(&self) -> Option<&str> {
        let participant = self.participant();
        participant
            .and_then(|p| p.gamer_tag.as_deref())
            .filter(|n| !n.trim().is_empty())
            .or_else(|| {
                participant
                    .and_then(|p| p.user.as_ref())
                    .and_then(|u| u.name.as_deref())
                    .filter(|n| !n.trim().is_empty())
            })
            .or_else(|| self.entrant_name())
    }

    pub fn country(&self) -> Option<&str> {
        self.participant()
            .and_then(|p| p.user.as_ref())
            .and_then(|u| u.location.as_ref())
            .and_then(|l| l.country.as_deref())
            .filter(|c| !c.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entrant {
    pub name: Option<String>,
    pub participants: Option<Vec<Participant>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: Option<SourceId>,
    pub gamer_tag: Option<String>,
    pub user: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub name: Option<String>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub country: Option<String>,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tournaments_response_deserialize() {
        let json = r#"{
            "data": {
                "tournaments": {
                    "nodes": [{
                        "id": 612345,
                        "name": "Combo Breaker 2025",
                        "slug": "tournament/combo-breaker-2025",
                        "startAt": 1716508800,
                        "endAt": 1716768000,
                        "numAttendees": 4100,
                        "events": [{
                            "id": 1001,
                            "name": "Tekken 8",
                            "videogame": { "id": 49783, "name": "Tekken 8" },
                            "standings": { "nodes": [
                                { "placement": 1, "entrant": { "name": "Arslan Ash", "participants": [
                                    { "id": 7, "gamerTag": "Arslan Ash", "user": { "name": "Arslan Siddique", "location": { "country": "Pakistan" } } }
                                ] } }
                            ] }
                        }]
                    }]
                }
            }
        }"#;

        let resp: GraphQlResponse<TournamentsData> = serde_json::from_str(json).unwrap();
        assert!(resp.errors.is_empty());
        let tournaments = resp.data.unwrap().tournaments.unwrap().into_nodes();
        assert_eq!(tournaments.len(), 1);
        let t = &tournaments[0];
        assert_eq!(t.id.as_str(), "612345");
        assert_eq!(t.num_attendees, Some(4100));
        let standing = &t.events()[0].standings()[0];
        assert_eq!(standing.placement, Some(1));
        assert_eq!(standing.display_name(), Some("Arslan Ash"));
        assert_eq!(standing.country(), Some("Pakistan"));
    }

    #[test]
    fn test_errors_envelope_deserialize() {
        let json = r#"{ "errors": [{ "message": "Your query complexity is too high." }], "data": null }"#;
        let resp: GraphQlResponse<TournamentsData> = serde_json::from_str(json).unwrap();
        assert!(resp.data.is_none());
        assert_eq!(resp.errors.len(), 1);
    }

    #[test]
    fn test_null_events_and_standings() {
        let json = r#"{ "id": "1", "name": "Locals", "events": null }"#;
        let t: RawTournament = serde_json::from_str(json).unwrap();
        assert!(t.events().is_empty());

        let json = r#"{ "id": 2, "name": "SF6", "videogame": null, "standings": null }"#;
        let e: RawEvent = serde_json::from_str(json).unwrap();
        assert!(e.standings().is_empty());
        assert!(!e.is_for_game(&SourceId::from(43868)));
    }

    #[test]
    fn test_display_name_fallbacks() {
        let json = r#"{ "placement": 3, "entrant": { "name": "Team Name", "participants": [
            { "id": 1, "gamerTag": "", "user": { "name": "Real Name", "location": null } }
        ] } }"#;
        let s: RawStanding = serde_json::from_str(json).unwrap();
        assert_eq!(s.display_name(), Some("Real Name"));
        assert_eq!(s.entrant_name(), Some("Team Name"));
        assert_eq!(s.country(), None);

        let json = r#"{ "placement": 4, "entrant": { "name": "Only Entrant" } }"#;
        let s: RawStanding = serde_json::from_str(json).unwrap();
        assert_eq!(s.display_name(), Some("Only Entrant"));

        let json = r#"{ "placement": 5, "entrant": null }"#;
        let s: RawStanding = serde_json::from_str(json).unwrap();
        assert_eq!(s.display_name(), None);
        assert_eq!(s.entrant_name(), None);
    }
}
