// src/services/social_graph_service_tests.rs
//
// SocialGraphService and StatisticsService scenarios

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, NaiveDate, Utc};

    use crate::domain::{
        CatalogStatistics, Film, FriendshipStatus, NewFilm, NewUser, User, UserId, UserPatch,
    };
    use crate::error::{AppError, ErrorKind};
    use crate::repositories::friendship_graph::MockFriendshipGraph;
    use crate::repositories::{
        EntityStore, InMemoryFriendshipGraph, InMemoryLikeIndex, InMemoryStore, LikeIndex,
    };
    use crate::services::{SocialGraphService, StatisticsService};

    // ========================================================================
    // TEST HELPERS
    // ========================================================================

    fn service() -> SocialGraphService {
        SocialGraphService::new(
            Arc::new(InMemoryStore::<User>::new()),
            Arc::new(InMemoryFriendshipGraph::new()),
            Arc::new(InMemoryLikeIndex::new()),
        )
    }

    fn draft(login: &str) -> NewUser {
        NewUser {
            email: format!("{}@example.com", login),
            login: login.to_string(),
            display_name: Some(format!("{} display", login)),
            birthday: NaiveDate::from_ymd_opt(1990, 5, 17),
        }
    }

    fn register(service: &SocialGraphService, logins: &[&str]) -> Vec<UserId> {
        logins
            .iter()
            .map(|login| service.create(draft(login)).unwrap().id)
            .collect()
    }

    fn ids(users: Vec<User>) -> Vec<UserId> {
        users.into_iter().map(|u| u.id).collect()
    }

    fn field_of(err: &AppError) -> Option<&'static str> {
        match err {
            AppError::Domain(domain) => domain.field(),
            _ => None,
        }
    }

    // ========================================================================
    // USERS
    // ========================================================================

    #[test]
    fn test_create_without_display_name_uses_login() {
        let service = service();
        let user = service
            .create(NewUser {
                email: "a@b.c".to_string(),
                login: "alice".to_string(),
                display_name: Some("   ".to_string()),
                birthday: None,
            })
            .unwrap();

        assert!(user.id > 0);
        assert_eq!(user.display_name, "alice");
    }

    #[test]
    fn test_create_rejects_bad_fields() {
        let service = service();

        let mut no_at = draft("bob");
        no_at.email = "bob.example.com".to_string();
        assert_eq!(field_of(&service.create(no_at).unwrap_err()), Some("email"));

        let mut spaced = draft("bob");
        spaced.login = "bob smith".to_string();
        assert_eq!(field_of(&service.create(spaced).unwrap_err()), Some("login"));

        let mut unborn = draft("bob");
        unborn.birthday = Some(Utc::now().date_naive() + Duration::days(2));
        assert_eq!(
            field_of(&service.create(unborn).unwrap_err()),
            Some("birthday")
        );

        assert!(service.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_update_merges_only_supplied_fields() {
        let service = service();
        let created = service.create(draft("carol")).unwrap();

        let updated = service
            .update(
                created.id,
                UserPatch {
                    email: Some("carol@films.org".to_string()),
                    birthday: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.email, "carol@films.org");
        assert_eq!(updated.login, created.login);
        assert_eq!(updated.display_name, created.display_name);
        assert_eq!(updated.birthday, None);
        assert_eq!(service.find_by_id(created.id).unwrap(), updated);
    }

    #[test]
    fn test_update_failure_keeps_stored_user() {
        let service = service();
        let created = service.create(draft("dave")).unwrap();

        let err = service
            .update(
                created.id,
                UserPatch {
                    display_name: Some("Dave".to_string()),
                    login: Some(String::new()),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(service.find_by_id(created.id).unwrap(), created);
    }

    #[test]
    fn test_duplicate_email_is_integrity_error() {
        let service = service();
        let first = service.create(draft("erin")).unwrap();

        let mut twin = draft("erin2");
        twin.email = first.email.clone();
        assert_eq!(
            service.create(twin).unwrap_err().kind(),
            ErrorKind::Integrity
        );
        assert_eq!(service.find_all().unwrap(), vec![first]);
    }

    #[test]
    fn test_update_missing_user_is_not_found() {
        let err = service()
            .update(7, UserPatch::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "User with id 7 not found");
    }

    // ========================================================================
    // FRIENDSHIPS
    // ========================================================================

    #[test]
    fn test_request_is_pending_until_reciprocated() {
        let service = service();
        let members = register(&service, &["u1", "u2"]);
        let (a, b) = (members[0], members[1]);

        service.add_friend(a, b).unwrap();
        assert_eq!(
            service.friendship_status(a, b).unwrap(),
            Some(FriendshipStatus::Pending)
        );
        assert_eq!(service.friendship_status(b, a).unwrap(), None);
        assert!(service.friends_of(a).unwrap().is_empty());

        service.add_friend(b, a).unwrap();
        assert_eq!(ids(service.friends_of(a).unwrap()), vec![b]);
        assert_eq!(ids(service.friends_of(b).unwrap()), vec![a]);
    }

    #[test]
    fn test_withdraw_after_confirmation_demotes_other_side() {
        let service = service();
        let members = register(&service, &["u1", "u2"]);
        let (a, b) = (members[0], members[1]);

        service.add_friend(a, b).unwrap();
        service.add_friend(b, a).unwrap();
        service.remove_friend(a, b).unwrap();

        assert!(!ids(service.friends_of(b).unwrap()).contains(&a));
        assert!(service.friends_of(a).unwrap().is_empty());
        assert_eq!(service.friendship_status(a, b).unwrap(), None);
        assert_eq!(
            service.friendship_status(b, a).unwrap(),
            Some(FriendshipStatus::Pending)
        );
    }

    #[test]
    fn test_repeated_request_is_idempotent() {
        let service = service();
        let members = register(&service, &["u1", "u2"]);

        service.add_friend(members[0], members[1]).unwrap();
        service.add_friend(members[0], members[1]).unwrap();
        assert_eq!(
            service.friendship_status(members[0], members[1]).unwrap(),
            Some(FriendshipStatus::Pending)
        );
    }

    #[test]
    fn test_remove_without_edge_succeeds() {
        let service = service();
        let members = register(&service, &["u1", "u2"]);

        service.remove_friend(members[0], members[1]).unwrap();
        assert_eq!(service.friendship_status(members[1], members[0]).unwrap(), None);
    }

    #[test]
    fn test_self_friendship_never_reaches_graph() {
        let users = Arc::new(InMemoryStore::<User>::new());
        // No expectations: any graph call fails the test
        let service = SocialGraphService::new(
            users,
            Arc::new(MockFriendshipGraph::new()),
            Arc::new(InMemoryLikeIndex::new()),
        );
        let id = service.create(draft("narcissus")).unwrap().id;

        let err = service.add_friend(id, id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_missing_user_never_reaches_graph() {
        let users = Arc::new(InMemoryStore::<User>::new());
        let service = SocialGraphService::new(
            users,
            Arc::new(MockFriendshipGraph::new()),
            Arc::new(InMemoryLikeIndex::new()),
        );
        let id = service.create(draft("solo")).unwrap().id;

        let err = service.add_friend(id, 404).unwrap_err();
        assert_eq!(err.to_string(), "User with id 404 not found");
        let err = service.remove_friend(404, id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            service.friends_of(404).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_common_friends_is_intersection() {
        let service = service();
        let members = register(&service, &["a", "b", "c", "d"]);
        let (a, b, c, d) = (members[0], members[1], members[2], members[3]);

        for (x, y) in [(a, c), (c, a), (b, c), (c, b), (a, d), (d, a), (b, d)] {
            service.add_friend(x, y).unwrap();
        }

        // b -> d is only pending, so d is not b's friend
        assert_eq!(ids(service.common_friends(a, b).unwrap()), vec![c]);
        assert_eq!(ids(service.common_friends(b, a).unwrap()), vec![c]);
    }

    // ========================================================================
    // STATISTICS
    // ========================================================================

    #[test]
    fn test_statistics_snapshot_counts_everything() {
        let films = Arc::new(InMemoryStore::<Film>::new());
        let users = Arc::new(InMemoryStore::<User>::new());
        let likes = Arc::new(InMemoryLikeIndex::new());
        let graph = Arc::new(InMemoryFriendshipGraph::new());
        let social = SocialGraphService::new(users.clone(), graph.clone(), likes.clone());
        let stats = StatisticsService::new(films.clone(), users.clone(), likes.clone(), graph);

        assert_eq!(stats.snapshot().unwrap(), CatalogStatistics::default());

        let members = register(&social, &["x", "y"]);
        let film = films
            .create(
                NewFilm {
                    title: "Counted".to_string(),
                    release_date: NaiveDate::from_ymd_opt(2001, 1, 1),
                    runtime_minutes: Some(100),
                    ..Default::default()
                }
                .into_film()
                .unwrap(),
            )
            .unwrap();
        likes.add_like(film.id, members[0]).unwrap();
        likes.add_like(film.id, members[1]).unwrap();
        social.add_friend(members[0], members[1]).unwrap();
        social.add_friend(members[1], members[0]).unwrap();

        let snapshot = stats.snapshot().unwrap();
        assert_eq!(snapshot.film_count, 1);
        assert_eq!(snapshot.user_count, 2);
        assert_eq!(snapshot.total_likes, 2);
        assert_eq!(snapshot.total_friendships, 2);
        assert_eq!(users.count().unwrap(), 2);

        social.delete(members[0]).unwrap();
        let snapshot = stats.snapshot().unwrap();
        assert_eq!(snapshot.user_count, 1);
        assert_eq!(snapshot.total_likes, 1);
        assert_eq!(snapshot.total_friendships, 0);
    }
}
