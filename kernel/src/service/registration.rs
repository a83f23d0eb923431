use std::sync::Arc;

use certificate::code::CheckInCode;
use certificate::document::{self, Certificate};
use chrono::Utc;
use derive_new::new;
use shared::error::{AppError, AppResult};

use crate::model::id::{EventId, UserId};
use crate::model::registration::event::{CreateRegistration, DeleteRegistration};
use crate::photo::PhotoFetcher;
use crate::repository::{
    event::EventRepository, registration::RegistrationRepository, user::UserRepository,
};
use crate::storage::{certificate_object_path, CertificateStore, StoreError};

/// 登録と証明書発行のオーケストレーター。
///
/// 検証 → 定員チェック → エンコード → 写真取得 → PDF 合成 → アップロード →
/// レコード永続化の順で進み、永続化に失敗した場合だけアップロード済みの
/// 証明書を削除する補償処理を行う。
#[derive(new)]
pub struct RegistrationService {
    event_repository: Arc<dyn EventRepository>,
    user_repository: Arc<dyn UserRepository>,
    registration_repository: Arc<dyn RegistrationRepository>,
    certificate_store: Arc<dyn CertificateStore>,
    photo_fetcher: Arc<dyn PhotoFetcher>,
}

impl RegistrationService {
    pub async fn register(&self, user_id: UserId, event_id: EventId) -> AppResult<String> {
        let event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("イベント（{event_id}）が見つかりませんでした。"))
            })?;
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("ユーザー（{user_id}）が見つかりませんでした。"))
            })?;
        if event.is_closed_at(Utc::now()) {
            return Err(AppError::EventClosed);
        }

        // 事前チェック。並行リクエストに対する最終的な防壁はここではなく
        // registrations の複合ユニーク制約が担う
        if self
            .registration_repository
            .exists(user_id, event_id)
            .await?
        {
            return Err(AppError::AlreadyRegistered);
        }
        let registered = self
            .registration_repository
            .count_by_event_id(event_id)
            .await?;
        if registered >= i64::from(event.capacity) {
            return Err(AppError::EventFull);
        }

        // ここまで副作用なし
        let code = CheckInCode::encode(user_id.raw(), event_id.raw())
            .map_err(|e| AppError::EncodingFailed(e.to_string()))?;

        // 写真はベストエフォート。取得に失敗しても証明書は発行する
        let photo = match &user.photo_url {
            Some(url) => match self.photo_fetcher.fetch(url).await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    tracing::warn!(
                        error.message = %e,
                        %user_id,
                        "participant photo could not be fetched; issuing without photo"
                    );
                    None
                }
            },
            None => None,
        };

        let document = document::render(
            &Certificate {
                participant_name: user.name.clone(),
                participant_email: user.email.clone(),
                event_title: event.title.clone(),
                event_date: event.date,
                event_location: event.location.clone(),
                registered_at: Utc::now(),
            },
            photo.as_deref(),
            &code,
        )
        .map_err(|e| AppError::CompositionFailed(e.to_string()))?;

        let path = certificate_object_path(user_id, event_id);
        let certificate_url = self
            .certificate_store
            .upload(&path, document, "application/pdf")
            .await?;

        // 永続化に失敗した場合（並行リクエストにユニーク制約で負けた等）は、
        // アップロード済みの証明書を孤児にしないよう削除してから呼び出し側へ返す
        match self
            .registration_repository
            .create(CreateRegistration::new(
                user_id,
                event_id,
                certificate_url.clone(),
            ))
            .await
        {
            Ok(_) => Ok(certificate_url),
            Err(err) => {
                if let Err(e) = self.certificate_store.delete(&path).await {
                    tracing::warn!(
                        error.message = %e,
                        %path,
                        "orphaned certificate could not be deleted after persist failure"
                    );
                }
                Err(err)
            }
        }
    }

    pub async fn cancel(&self, user_id: UserId, event_id: EventId) -> AppResult<()> {
        let removed = self
            .registration_repository
            .delete(DeleteRegistration::new(user_id, event_id))
            .await?;
        if removed.is_none() {
            return Err(AppError::NotRegistered);
        }

        // レコード削除が確定した時点でキャンセルは成立。
        // 以降の証明書削除の失敗は巻き戻さない
        let path = certificate_object_path(user_id, event_id);
        match self.certificate_store.delete(&path).await {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => {
                tracing::warn!(%path, "certificate was already absent on cancellation");
            }
            Err(e) => {
                tracing::warn!(
                    error.message = %e,
                    %path,
                    "certificate could not be deleted; left for reconciliation"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};

    use super::*;
    use crate::model::event::{Event, EventListOptions, PaginatedEventList};
    use crate::model::id::RegistrationId;
    use crate::model::registration::{RegisteredEvent, Registration};
    use crate::model::user::User;
    use crate::storage::memory::MemoryCertificateStore;

    struct StaticEventRepository(HashMap<EventId, Event>);

    #[async_trait]
    impl EventRepository for StaticEventRepository {
        async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<Event>> {
            Ok(self.0.get(&event_id).cloned())
        }

        async fn find_all(&self, options: EventListOptions) -> AppResult<PaginatedEventList> {
            Ok(PaginatedEventList {
                total: 0,
                limit: options.limit,
                offset: options.offset,
                items: vec![],
            })
        }
    }

    struct StaticUserRepository(HashMap<UserId, User>);

    #[async_trait]
    impl UserRepository for StaticUserRepository {
        async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
            Ok(self.0.get(&user_id).cloned())
        }
    }

    /// 複合ユニーク制約を模したインメモリ実装。create はロックの中で
    /// 重複チェックと挿入を不可分に行う。
    #[derive(Default)]
    struct InMemoryRegistrationRepository {
        rows: Mutex<Vec<Registration>>,
        reject_next_create: AtomicBool,
    }

    #[async_trait]
    impl RegistrationRepository for InMemoryRegistrationRepository {
        async fn create(&self, event: CreateRegistration) -> AppResult<RegistrationId> {
            if self.reject_next_create.swap(false, Ordering::SeqCst) {
                return Err(AppError::AlreadyRegistered);
            }
            let mut rows = self.rows.lock().unwrap();
            if rows
                .iter()
                .any(|r| r.user_id == event.user_id && r.event_id == event.event_id)
            {
                return Err(AppError::AlreadyRegistered);
            }
            let registration_id = RegistrationId::new();
            rows.push(Registration {
                registration_id,
                user_id: event.user_id,
                event_id: event.event_id,
                registered_at: Utc::now(),
                certificate_url: Some(event.certificate_url),
            });
            Ok(registration_id)
        }

        async fn delete(&self, event: DeleteRegistration) -> AppResult<Option<Registration>> {
            let mut rows = self.rows.lock().unwrap();
            let position = rows
                .iter()
                .position(|r| r.user_id == event.user_id && r.event_id == event.event_id);
            Ok(position.map(|i| rows.remove(i)))
        }

        async fn exists(&self, user_id: UserId, event_id: EventId) -> AppResult<bool> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .any(|r| r.user_id == user_id && r.event_id == event_id))
        }

        async fn count_by_event_id(&self, event_id: EventId) -> AppResult<i64> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.event_id == event_id)
                .count() as i64)
        }

        async fn find_registered_events(
            &self,
            _user_id: UserId,
        ) -> AppResult<Vec<RegisteredEvent>> {
            Ok(vec![])
        }
    }

    /// アップロード・削除を選択的に失敗させるラッパー。
    struct FlakyStore {
        inner: MemoryCertificateStore,
        fail_uploads: AtomicBool,
        fail_deletes: AtomicBool,
    }

    impl FlakyStore {
        fn reliable(inner: MemoryCertificateStore) -> Self {
            Self {
                inner,
                fail_uploads: AtomicBool::new(false),
                fail_deletes: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl CertificateStore for FlakyStore {
        async fn upload(
            &self,
            path: &str,
            bytes: Vec<u8>,
            content_type: &str,
        ) -> Result<String, StoreError> {
            if self.fail_uploads.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("upload timed out".into()));
            }
            self.inner.upload(path, bytes, content_type).await
        }

        async fn delete(&self, path: &str) -> Result<(), StoreError> {
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("delete timed out".into()));
            }
            self.inner.delete(path).await
        }

        fn public_url(&self, path: &str) -> String {
            self.inner.public_url(path)
        }
    }

    struct NoPhoto;

    #[async_trait]
    impl PhotoFetcher for NoPhoto {
        async fn fetch(&self, _url: &str) -> anyhow::Result<Vec<u8>> {
            anyhow::bail!("photo host unreachable")
        }
    }

    fn event_at(date: DateTime<Utc>, capacity: i32) -> Event {
        Event {
            event_id: EventId::new(),
            title: "RustConf".into(),
            date,
            location: "Tokyo".into(),
            capacity,
            image_url: None,
            description: None,
        }
    }

    fn participant(photo_url: Option<String>) -> User {
        User {
            user_id: UserId::new(),
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            photo_url,
            is_blocked: false,
        }
    }

    struct Fixture {
        service: RegistrationService,
        registrations: Arc<InMemoryRegistrationRepository>,
        objects: MemoryCertificateStore,
        store: Arc<FlakyStore>,
        user_id: UserId,
        event_id: EventId,
    }

    fn fixture(event: Event, user: User) -> Fixture {
        let user_id = user.user_id;
        let event_id = event.event_id;
        let registrations = Arc::new(InMemoryRegistrationRepository::default());
        let objects = MemoryCertificateStore::new();
        let store = Arc::new(FlakyStore::reliable(objects.clone()));
        let service = RegistrationService::new(
            Arc::new(StaticEventRepository(HashMap::from([(event_id, event)]))),
            Arc::new(StaticUserRepository(HashMap::from([(user_id, user)]))),
            registrations.clone(),
            store.clone(),
            Arc::new(NoPhoto),
        );
        Fixture {
            service,
            registrations,
            objects,
            store,
            user_id,
            event_id,
        }
    }

    fn upcoming() -> DateTime<Utc> {
        Utc::now() + Duration::days(1)
    }

    #[tokio::test]
    async fn register_issues_certificate_and_persists_record() {
        let f = fixture(event_at(upcoming(), 10), participant(None));

        let url = f.service.register(f.user_id, f.event_id).await.unwrap();

        let path = certificate_object_path(f.user_id, f.event_id);
        assert_eq!(url, format!("memory://{path}"));
        assert!(f.objects.contains(&path).await);
        assert_eq!(
            f.registrations.count_by_event_id(f.event_id).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn register_unknown_event_is_not_found() {
        let f = fixture(event_at(upcoming(), 10), participant(None));

        let err = f.service.register(f.user_id, EventId::new()).await.unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));
        assert_eq!(f.objects.object_count().await, 0);
    }

    #[tokio::test]
    async fn register_unknown_user_is_not_found() {
        let f = fixture(event_at(upcoming(), 10), participant(None));

        let err = f.service.register(UserId::new(), f.event_id).await.unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));
    }

    #[tokio::test]
    async fn register_for_past_event_is_closed() {
        let f = fixture(event_at(Utc::now() - Duration::days(1), 10), participant(None));

        let err = f.service.register(f.user_id, f.event_id).await.unwrap_err();

        assert!(matches!(err, AppError::EventClosed));
        // レコードも証明書も作られない
        assert_eq!(
            f.registrations.count_by_event_id(f.event_id).await.unwrap(),
            0
        );
        assert_eq!(f.objects.object_count().await, 0);
    }

    #[tokio::test]
    async fn register_twice_is_already_registered() {
        let f = fixture(event_at(upcoming(), 10), participant(None));

        f.service.register(f.user_id, f.event_id).await.unwrap();
        let err = f.service.register(f.user_id, f.event_id).await.unwrap_err();

        assert!(matches!(err, AppError::AlreadyRegistered));
        assert_eq!(
            f.registrations.count_by_event_id(f.event_id).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn register_when_capacity_reached_is_event_full() {
        let event = event_at(upcoming(), 1);
        let event_id = event.event_id;
        let f = fixture(event, participant(None));

        // 別の参加者が先に唯一の枠を埋めている
        f.registrations
            .create(CreateRegistration::new(
                UserId::new(),
                event_id,
                "memory://taken".into(),
            ))
            .await
            .unwrap();

        let err = f.service.register(f.user_id, f.event_id).await.unwrap_err();
        assert!(matches!(err, AppError::EventFull));
        assert_eq!(f.objects.object_count().await, 0);
    }

    #[tokio::test]
    async fn upload_failure_leaves_no_record() {
        let f = fixture(event_at(upcoming(), 10), participant(None));
        f.store.fail_uploads.store(true, Ordering::SeqCst);

        let err = f.service.register(f.user_id, f.event_id).await.unwrap_err();

        assert!(matches!(err, AppError::StoreUnavailable(_)));
        assert_eq!(
            f.registrations.count_by_event_id(f.event_id).await.unwrap(),
            0
        );
        assert_eq!(f.objects.object_count().await, 0);
    }

    #[tokio::test]
    async fn persist_conflict_deletes_uploaded_certificate() {
        let f = fixture(event_at(upcoming(), 10), participant(None));
        // 事前チェック通過後に並行リクエストへ負けた状況を再現する
        f.registrations
            .reject_next_create
            .store(true, Ordering::SeqCst);

        let err = f.service.register(f.user_id, f.event_id).await.unwrap_err();

        assert!(matches!(err, AppError::AlreadyRegistered));
        // 補償処理でアップロード済みの証明書が消えている
        assert_eq!(f.objects.object_count().await, 0);
    }

    #[tokio::test]
    async fn photo_fetch_failure_still_issues_certificate() {
        let f = fixture(
            event_at(upcoming(), 10),
            participant(Some("https://photos.example.com/ada.png".into())),
        );

        let url = f.service.register(f.user_id, f.event_id).await.unwrap();
        assert!(url.starts_with("memory://"));
    }

    #[tokio::test]
    async fn cancel_removes_record_and_certificate() {
        let f = fixture(event_at(upcoming(), 10), participant(None));
        f.service.register(f.user_id, f.event_id).await.unwrap();

        f.service.cancel(f.user_id, f.event_id).await.unwrap();

        assert_eq!(
            f.registrations.count_by_event_id(f.event_id).await.unwrap(),
            0
        );
        assert_eq!(f.objects.object_count().await, 0);
    }

    #[tokio::test]
    async fn cancel_without_registration_is_not_registered() {
        let f = fixture(event_at(upcoming(), 10), participant(None));

        let err = f.service.cancel(f.user_id, f.event_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotRegistered));
    }

    #[tokio::test]
    async fn cancel_is_irrevocable_even_if_certificate_delete_fails() {
        let f = fixture(event_at(upcoming(), 10), participant(None));
        f.service.register(f.user_id, f.event_id).await.unwrap();
        f.store.fail_deletes.store(true, Ordering::SeqCst);

        // 証明書の削除に失敗してもキャンセル自体は成立する
        f.service.cancel(f.user_id, f.event_id).await.unwrap();

        assert_eq!(
            f.registrations.count_by_event_id(f.event_id).await.unwrap(),
            0
        );
        // 孤児になった証明書は残る（照合処理の対象）
        assert_eq!(f.objects.object_count().await, 1);
    }

    #[tokio::test]
    async fn reregistration_after_cancel_succeeds() {
        let f = fixture(event_at(upcoming(), 10), participant(None));

        f.service.register(f.user_id, f.event_id).await.unwrap();
        f.service.cancel(f.user_id, f.event_id).await.unwrap();
        let url = f.service.register(f.user_id, f.event_id).await.unwrap();

        assert!(f
            .objects
            .contains(&certificate_object_path(f.user_id, f.event_id))
            .await);
        assert!(url.starts_with("memory://"));
        assert_eq!(
            f.registrations.count_by_event_id(f.event_id).await.unwrap(),
            1
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_duplicate_attempts_keep_at_most_one_record() {
        let f = fixture(event_at(upcoming(), 10), participant(None));
        let service = Arc::new(f.service);

        let a = tokio::spawn({
            let service = service.clone();
            let (user_id, event_id) = (f.user_id, f.event_id);
            async move { service.register(user_id, event_id).await }
        });
        let b = tokio::spawn({
            let service = service.clone();
            let (user_id, event_id) = (f.user_id, f.event_id);
            async move { service.register(user_id, event_id).await }
        });

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();

        // どちらが勝っても成立する登録は最大 1 件
        assert!(successes <= 1);
        assert!(
            f.registrations.count_by_event_id(f.event_id).await.unwrap() <= 1
        );
        // 敗者の証明書は補償処理で消えるため、オブジェクトは高々 1 つ
        assert!(f.objects.object_count().await <= 1);
    }
}
