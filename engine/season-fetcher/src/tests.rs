//! Unit tests for schedule resolution and sequential ingestion

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::config::ProviderConfig;
use crate::report::{EXIT_INGEST_ABORTED, EXIT_NO_DATA, EXIT_OK};
use crate::{
    ingest_feeds, played_game_locations, FeedLocation, FetchError, FetchResponse, FetcherConfig,
    IngestStatus, ScheduleEntry, SeasonFetcher, Transport, TransportError,
};

/// In-memory transport that serves canned responses and records every request
#[derive(Default)]
struct ScriptedTransport {
    responses: HashMap<String, Result<FetchResponse, TransportError>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn with_json(mut self, url: &str, body: Value) -> Self {
        let body = serde_json::to_vec(&body).unwrap();
        self.responses.insert(url.to_string(), Ok(FetchResponse { status: 200, body }));
        self
    }

    fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Ok(FetchResponse { status, body: Vec::new() }));
        self
    }

    fn with_failure(mut self, url: &str) -> Self {
        let message = "connection reset".to_string();
        let error = TransportError { url: url.to_string(), message };
        self.responses.insert(url.to_string(), Err(error));
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Ok(FetchResponse { status: 404, body: Vec::new() }))
    }
}

const SCHEDULE_URL: &str = "http://stats.test/schedule-20172018.json";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, 15).unwrap()
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, day).unwrap()
}

fn test_config() -> FetcherConfig {
    FetcherConfig {
        provider: ProviderConfig {
            schedule_url_template: "http://stats.test/schedule-{season}.json".to_string(),
            feed_url_template: "http://stats.test/game/{game_id}".to_string(),
        },
        ..Default::default()
    }
}

fn feed_url(game_id: u64) -> String {
    test_config().provider.feed_url(game_id)
}

fn location(game_id: u64, scheduled: NaiveDate) -> FeedLocation {
    FeedLocation { game_id, scheduled, url: feed_url(game_id) }
}

fn game_feed(game_pk: u64, faceoffs: &[(u32, f64, &str)]) -> Value {
    let plays: Vec<Value> = faceoffs
        .iter()
        .map(|(period, x, winner)| {
            json!({
                "result": { "eventTypeId": "FACEOFF" },
                "about": { "period": period },
                "coordinates": { "x": x, "y": 0.0 },
                "team": { "triCode": winner }
            })
        })
        .collect();

    json!({
        "gamePk": game_pk,
        "gameData": { "teams": { "home": { "triCode": "PIT" }, "away": { "triCode": "STL" } } },
        "liveData": {
            "linescore": { "periods": [ { "home": { "rinkSide": "left" } } ] },
            "plays": { "allPlays": plays }
        }
    })
}

/// Embed a UTC start time in a feed document
fn starting_at(mut feed: Value, date_time: &str) -> Value {
    feed["gameData"]["datetime"] = json!({ "dateTime": date_time });
    feed
}

#[cfg(test)]
mod schedule_tests {
    use super::*;

    fn entry(id: u64, est: &str) -> ScheduleEntry {
        ScheduleEntry { id, est: est.to_string() }
    }

    #[test]
    fn test_only_past_games_are_resolved() {
        let entries = vec![
            entry(1, "20180110 19:00:00"),
            entry(2, "20180112 19:30:00"),
            entry(3, "20180114 22:00:00"),
            entry(4, "20180120 19:00:00"),
        ];

        let locations = played_game_locations(&entries, today(), &test_config().provider);

        assert_eq!(locations.len(), 3);
        assert_eq!(locations.iter().map(|l| l.game_id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(locations[0].url, "http://stats.test/game/1");
        assert_eq!(locations[2].scheduled, date(14));
    }

    #[test]
    fn test_games_scheduled_today_are_excluded() {
        let entries = vec![entry(1, "20180114 19:00:00"), entry(2, "20180115 13:00:00")];
        let locations = played_game_locations(&entries, today(), &test_config().provider);
        assert_eq!(locations, vec![location(1, date(14))]);
    }

    #[test]
    fn test_unreadable_dates_are_ignored() {
        let entries = vec![entry(1, "TBD"), entry(2, "2018"), entry(3, "20180113 19:00:00")];
        let locations = played_game_locations(&entries, today(), &test_config().provider);
        assert_eq!(locations, vec![location(3, date(13))]);
    }

    #[tokio::test]
    async fn test_resolve_schedule_fetches_and_filters() {
        let transport = ScriptedTransport::default().with_json(
            SCHEDULE_URL,
            json!([
                { "id": 2017020001, "est": "20171004 19:00:00", "a": "STL", "h": "PIT" },
                { "id": 2017020002, "est": "20180301 19:00:00", "a": "CHI", "h": "PIT" }
            ]),
        );
        let fetcher = SeasonFetcher::with_transport(test_config(), Arc::new(transport));

        let locations = fetcher.resolve_schedule("20172018", today()).await.unwrap();

        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].game_id, 2017020001);
    }

    #[tokio::test]
    async fn test_schedule_status_failure() {
        let transport = ScriptedTransport::default().with_status(SCHEDULE_URL, 503);
        let fetcher = SeasonFetcher::with_transport(test_config(), Arc::new(transport));

        let err = fetcher.resolve_schedule("20172018", today()).await.unwrap_err();

        assert_eq!(err.season, "20172018");
        assert!(matches!(err.source, FetchError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_schedule_transport_failure() {
        let transport = ScriptedTransport::default().with_failure(SCHEDULE_URL);
        let fetcher = SeasonFetcher::with_transport(test_config(), Arc::new(transport));

        let err = fetcher.resolve_schedule("20172018", today()).await.unwrap_err();
        assert!(matches!(err.source, FetchError::Transport(_)));
    }
}

#[cfg(test)]
mod ingest_tests {
    use super::*;

    #[tokio::test]
    async fn test_ingest_completes_in_order() {
        let transport = ScriptedTransport::default()
            .with_json(&feed_url(1), game_feed(1, &[]))
            .with_json(&feed_url(2), game_feed(2, &[]))
            .with_json(&feed_url(3), game_feed(3, &[]));
        let locations = vec![location(1, date(10)), location(2, date(11)), location(3, date(12))];

        let ingestion = ingest_feeds(&transport, &locations, today()).await;

        assert!(matches!(ingestion.status, IngestStatus::Completed));
        assert_eq!(ingestion.feeds.iter().map(|f| f.game_pk).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(ingestion.last_attempted, Some(3));
        assert_eq!(transport.requests(), vec![feed_url(1), feed_url(2), feed_url(3)]);
    }

    #[tokio::test]
    async fn test_soft_stop_at_first_unplayed_game() {
        let transport = ScriptedTransport::default()
            .with_json(&feed_url(1), game_feed(1, &[]))
            .with_json(&feed_url(2), game_feed(2, &[]))
            .with_json(&feed_url(3), game_feed(3, &[]))
            .with_json(&feed_url(4), game_feed(4, &[]));
        let locations = vec![
            location(1, date(10)),
            location(2, date(11)),
            location(3, date(15)),
            location(4, date(12)),
        ];

        let ingestion = ingest_feeds(&transport, &locations, today()).await;

        match ingestion.status {
            IngestStatus::StoppedEarly { game_id, game_date } => {
                assert_eq!(game_id, 3);
                assert_eq!(game_date, date(15));
            }
            other => panic!("Expected StoppedEarly, got {:?}", other),
        }
        assert_eq!(ingestion.feeds.len(), 2);
        assert!(!transport.requests().contains(&feed_url(4)));
    }

    #[tokio::test]
    async fn test_late_start_counts_on_schedule_date() {
        // 10:30 p.m. Eastern on the 14th is already the 15th in UTC
        let late = starting_at(game_feed(1, &[]), "2018-01-15T03:30:00Z");
        let transport = ScriptedTransport::default().with_json(&feed_url(1), late);

        let ingestion = ingest_feeds(&transport, &[location(1, date(14))], today()).await;

        assert!(matches!(ingestion.status, IngestStatus::Completed));
        assert_eq!(ingestion.feeds.len(), 1);
    }

    #[tokio::test]
    async fn test_hard_failure_keeps_earlier_feeds() {
        let transport = ScriptedTransport::default()
            .with_json(&feed_url(1), game_feed(1, &[]))
            .with_failure(&feed_url(2))
            .with_json(&feed_url(3), game_feed(3, &[]));
        let locations = vec![location(1, date(10)), location(2, date(11)), location(3, date(12))];

        let ingestion = ingest_feeds(&transport, &locations, today()).await;

        match &ingestion.status {
            IngestStatus::Aborted(e) => {
                assert_eq!(e.game_id, 2);
                assert!(matches!(e.source, FetchError::Transport(_)));
            }
            other => panic!("Expected Aborted, got {:?}", other),
        }
        assert_eq!(ingestion.feeds.len(), 1);
        assert_eq!(ingestion.feeds[0].game_pk, 1);
        assert_eq!(ingestion.last_attempted, Some(2));
        assert_eq!(transport.requests(), vec![feed_url(1), feed_url(2)]);
    }

    #[tokio::test]
    async fn test_bad_status_and_bad_body_abort() {
        let transport = ScriptedTransport::default().with_status(&feed_url(1), 500);
        let ingestion = ingest_feeds(&transport, &[location(1, date(10))], today()).await;
        assert!(matches!(
            ingestion.status,
            IngestStatus::Aborted(ref e)
                if matches!(e.source, FetchError::Status { status: 500, .. })
        ));

        let transport =
            ScriptedTransport::default().with_json(&feed_url(1), json!({ "gamePk": 1 }));
        let ingestion = ingest_feeds(&transport, &[location(1, date(10))], today()).await;
        assert!(matches!(
            ingestion.status,
            IngestStatus::Aborted(ref e) if matches!(e.source, FetchError::Decode { .. })
        ));
        assert!(ingestion.feeds.is_empty());
    }

    #[tokio::test]
    async fn test_empty_schedule_completes() {
        let transport = ScriptedTransport::default();
        let ingestion = ingest_feeds(&transport, &[], today()).await;
        assert!(matches!(ingestion.status, IngestStatus::Completed));
        assert_eq!(ingestion.last_attempted, None);
        assert!(transport.requests().is_empty());
    }
}

#[cfg(test)]
mod season_run_tests {
    use super::*;

    fn schedule() -> Value {
        json!([
            { "id": 1, "est": "20180110 19:00:00" },
            { "id": 2, "est": "20180111 19:00:00" },
            { "id": 3, "est": "20180220 19:00:00" }
        ])
    }

    #[tokio::test]
    async fn test_full_season_run() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .with_json(SCHEDULE_URL, schedule())
                .with_json(&feed_url(1), game_feed(1, &[(1, 0.0, "PIT"), (1, 69.0, "PIT")]))
                .with_json(&feed_url(2), game_feed(2, &[(2, -5.0, "STL"), (1, 0.0, "STL")])),
        );
        let fetcher = SeasonFetcher::with_transport(test_config(), transport.clone());

        let run = fetcher.run_season("20172018", today()).await.unwrap();

        assert!(matches!(run.ingestion.status, IngestStatus::Completed));
        assert_eq!(run.report.aggregate.total_faceoffs, 4);
        assert_eq!(run.report.aggregate.offensive_wins, 2);
        assert_eq!(run.ratio().unwrap(), 0.5);
        assert_eq!(run.exit_code(), EXIT_OK);
        assert!(!transport.requests().contains(&feed_url(3)));

        let summary = serde_json::to_value(run.summary()).unwrap();
        assert_eq!(summary["status"], "completed");
        assert_eq!(summary["games_fetched"], 2);
        assert_eq!(summary["ratio"], 0.5);
    }

    #[tokio::test]
    async fn test_stale_schedule_stops_at_feed_dated_in_future() {
        let rescheduled = starting_at(game_feed(2, &[]), "2018-02-20T00:00:00Z");
        let transport = Arc::new(
            ScriptedTransport::default()
                .with_json(
                    SCHEDULE_URL,
                    json!([
                        { "id": 1, "est": "20180110 19:00:00" },
                        { "id": 2, "est": "20180111 19:00:00" },
                        { "id": 3, "est": "20180112 19:00:00" }
                    ]),
                )
                .with_json(&feed_url(1), game_feed(1, &[(1, 69.0, "PIT")]))
                .with_json(&feed_url(2), rescheduled)
                .with_json(&feed_url(3), game_feed(3, &[])),
        );
        let fetcher = SeasonFetcher::with_transport(test_config(), transport.clone());

        let run = fetcher.run_season("20172018", today()).await.unwrap();

        match run.ingestion.status {
            IngestStatus::StoppedEarly { game_id, game_date } => {
                assert_eq!(game_id, 2);
                assert_eq!(game_date, NaiveDate::from_ymd_opt(2018, 2, 19).unwrap());
            }
            ref other => panic!("Expected StoppedEarly, got {:?}", other),
        }
        assert_eq!(run.ingestion.feeds.len(), 1);
        assert_eq!(transport.requests(), vec![SCHEDULE_URL.to_string(), feed_url(1), feed_url(2)]);
        assert_eq!(run.ratio().unwrap(), 1.0);
        assert_eq!(run.exit_code(), EXIT_OK);
        assert_eq!(run.summary().status, "stopped_early");
    }

    #[tokio::test]
    async fn test_aborted_run_still_analyzes_partial_feeds() {
        let transport = ScriptedTransport::default()
            .with_json(SCHEDULE_URL, schedule())
            .with_json(&feed_url(1), game_feed(1, &[(1, 69.0, "PIT")]))
            .with_failure(&feed_url(2));
        let fetcher = SeasonFetcher::with_transport(test_config(), Arc::new(transport));

        let run = fetcher.run_season("20172018", today()).await.unwrap();

        assert_eq!(run.ratio().unwrap(), 1.0);
        assert_eq!(run.exit_code(), EXIT_INGEST_ABORTED);

        let summary = run.summary();
        assert_eq!(summary.status, "aborted");
        assert_eq!(summary.last_attempted, Some(2));
        assert!(summary.error.is_some());
    }

    #[tokio::test]
    async fn test_run_without_faceoffs_is_no_data() {
        let transport = ScriptedTransport::default()
            .with_json(SCHEDULE_URL, json!([{ "id": 1, "est": "20180110 19:00:00" }]))
            .with_json(&feed_url(1), game_feed(1, &[]));
        let fetcher = SeasonFetcher::with_transport(test_config(), Arc::new(transport));

        let run = fetcher.run_season("20172018", today()).await.unwrap();

        assert!(run.ratio().is_err());
        assert_eq!(run.exit_code(), EXIT_NO_DATA);
        assert_eq!(run.summary().ratio, None);
    }
}
