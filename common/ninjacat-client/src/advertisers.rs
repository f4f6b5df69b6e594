//! Advertiser listing

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::client::NinjacatClient;
use crate::error::Result;
use crate::ids::AdvertiserId;
use crate::lenient;

const ADVERTISERS_ENDPOINT: &str = "/management_open_api/advertisers";

/// Custom field defined at agency level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: u64,
    pub name: String,
}

/// Value of a custom field and the advertisers it is assigned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldValue {
    pub id: u64,
    pub custom_field_id: u64,
    pub name: String,
    #[serde(rename = "advertiserIds", default, deserialize_with = "lenient::list")]
    pub advertiser_ids: Vec<AdvertiserId>,
}

/// An advertiser managed by the agency
///
/// The record is kept exactly as the service sent it and is what serializing
/// an advertiser writes back, nulls and unknown fields included. The typed
/// fields are a read view over that record: only `id` is required, anything
/// null, missing or of an unexpected type reads as empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Advertiser {
    pub id: AdvertiserId,
    pub name: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub external_id: Option<String>,
    pub phone_conv_period: Option<i64>,
    pub phone_conv_threshold: Option<i64>,
    pub owner_id: Option<u64>,
    pub date_format: Option<i64>,
    pub digit_format: Option<i64>,
    pub timezone: Option<String>,
    pub currency_pre_format: Option<String>,
    pub currency_post_format: Option<String>,
    pub ninjatrack_email: Option<String>,
    pub only_conv_notify: Option<i64>,
    pub anonymize_callers: Option<i64>,
    pub budget: Option<f64>,
    pub budget_warning: Option<f64>,
    pub budget_critical: Option<f64>,
    pub facebook_campaigns: Option<String>,
    pub tools_keyword_filter: Option<String>,
    pub use_phone_mappings: Option<i64>,
    pub custom_field: Option<String>,
    pub account_custom_field_values: Vec<CustomFieldValue>,
    record: Map<String, Value>,
}

#[derive(Deserialize)]
struct AdvertiserView {
    id: AdvertiserId,
    #[serde(default, deserialize_with = "lenient::or_default")]
    name: String,
    #[serde(default, deserialize_with = "lenient::option")]
    phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    company: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    email: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    website: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    external_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    phone_conv_period: Option<i64>,
    #[serde(default, deserialize_with = "lenient::option")]
    phone_conv_threshold: Option<i64>,
    #[serde(default, deserialize_with = "lenient::option")]
    owner_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option")]
    date_format: Option<i64>,
    #[serde(default, deserialize_with = "lenient::option")]
    digit_format: Option<i64>,
    #[serde(default, deserialize_with = "lenient::option")]
    timezone: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    currency_pre_format: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    currency_post_format: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    ninjatrack_email: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    only_conv_notify: Option<i64>,
    #[serde(default, deserialize_with = "lenient::option")]
    anonymize_callers: Option<i64>,
    #[serde(default, deserialize_with = "lenient::option")]
    budget: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option")]
    budget_warning: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option")]
    budget_critical: Option<f64>,
    #[serde(default, deserialize_with = "lenient::option")]
    facebook_campaigns: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    tools_keyword_filter: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    use_phone_mappings: Option<i64>,
    #[serde(default, deserialize_with = "lenient::option")]
    custom_field: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    account_custom_field_values: Vec<CustomFieldValue>,
}

impl Advertiser {
    /// The record as the service sent it
    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }

    /// Raw value of any field, including ones the typed view does not name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.record.get(field)
    }

    pub fn into_record(self) -> Map<String, Value> {
        self.record
    }
}

impl TryFrom<Map<String, Value>> for Advertiser {
    type Error = serde_json::Error;

    fn try_from(record: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        let view: AdvertiserView = serde_json::from_value(Value::Object(record.clone()))?;
        Ok(Advertiser {
            id: view.id,
            name: view.name,
            phone: view.phone,
            company: view.company,
            email: view.email,
            website: view.website,
            external_id: view.external_id,
            phone_conv_period: view.phone_conv_period,
            phone_conv_threshold: view.phone_conv_threshold,
            owner_id: view.owner_id,
            date_format: view.date_format,
            digit_format: view.digit_format,
            timezone: view.timezone,
            currency_pre_format: view.currency_pre_format,
            currency_post_format: view.currency_post_format,
            ninjatrack_email: view.ninjatrack_email,
            only_conv_notify: view.only_conv_notify,
            anonymize_callers: view.anonymize_callers,
            budget: view.budget,
            budget_warning: view.budget_warning,
            budget_critical: view.budget_critical,
            facebook_campaigns: view.facebook_campaigns,
            tools_keyword_filter: view.tools_keyword_filter,
            use_phone_mappings: view.use_phone_mappings,
            custom_field: view.custom_field,
            account_custom_field_values: view.account_custom_field_values,
            record,
        })
    }
}

impl<'de> Deserialize<'de> for Advertiser {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = Map::<String, Value>::deserialize(deserializer)?;
        Advertiser::try_from(record).map_err(D::Error::custom)
    }
}

impl Serialize for Advertiser {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.record.serialize(serializer)
    }
}

impl NinjacatClient {
    /// List every advertiser of the agency
    ///
    /// Authenticates first if needed. The service returns the whole list in one
    /// response; there is no paging.
    pub async fn advertisers(&self) -> Result<Vec<Advertiser>> {
        self.get(ADVERTISERS_ENDPOINT).await
    }
}
