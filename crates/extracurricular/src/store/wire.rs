use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Activity, ActivityId, Credential, Dataset, Student, StudentId, Teacher, TeacherId,
};

/// On-disk layout as read. Keys stay strings until [`DatasetFile::decode`].
#[derive(Debug, Default, Deserialize)]
pub(crate) struct DatasetFile {
    #[serde(default)]
    activities: BTreeMap<String, Activity>,
    #[serde(default)]
    students: BTreeMap<String, Student>,
    #[serde(default)]
    users: BTreeMap<String, Credential>,
    #[serde(default)]
    teachers: BTreeMap<String, Teacher>,
}

/// On-disk layout as written. Integer keys are emitted as JSON strings.
#[derive(Debug, Serialize)]
pub(crate) struct DatasetFileRef<'a> {
    activities: &'a BTreeMap<ActivityId, Activity>,
    students: &'a BTreeMap<StudentId, Student>,
    users: &'a BTreeMap<String, Credential>,
    teachers: &'a BTreeMap<TeacherId, Teacher>,
}

impl<'a> From<&'a Dataset> for DatasetFileRef<'a> {
    fn from(dataset: &'a Dataset) -> Self {
        Self {
            activities: &dataset.activities,
            students: &dataset.students,
            users: &dataset.users,
            teachers: &dataset.teachers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{collection} key '{key}' is not an integer identifier")]
pub(crate) struct KeyDecodeError {
    pub collection: &'static str,
    pub key: String,
}

impl DatasetFile {
    pub(crate) fn decode(self) -> Result<Dataset, KeyDecodeError> {
        Ok(Dataset {
            activities: decode_keys("activities", self.activities, ActivityId)?,
            students: decode_keys("students", self.students, StudentId)?,
            teachers: decode_keys("teachers", self.teachers, TeacherId)?,
            users: self.users,
        })
    }
}

fn decode_keys<K: Ord, V>(
    collection: &'static str,
    raw: BTreeMap<String, V>,
    wrap: fn(u32) -> K,
) -> Result<BTreeMap<K, V>, KeyDecodeError> {
    raw.into_iter()
        .map(|(key, value)| match key.trim().parse::<u32>() {
            Ok(id) => Ok((wrap(id), value)),
            Err(_) => Err(KeyDecodeError { collection, key }),
        })
        .collect()
}
