use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::{
    error::{ListenerError, PropertyError},
    listener::{ListenerId, Listeners, ValueChangeListener, ValueChangeNotifier},
};

/// One field of an item
pub trait Property: Send + Sync {
    /// Current value of the field
    fn value(&self) -> Value;

    /// Replaces the value of the field
    fn set_value(&self, value: Value) -> Result<(), PropertyError>;

    /// The change notification capability of this property, if it has one
    fn as_notifier(&self) -> Option<&dyn ValueChangeNotifier> {
        None
    }
}

/// A property that announces every change of its value to attached listeners
pub struct ObservableProperty {
    value: RwLock<Value>,
    listeners: Listeners<dyn ValueChangeListener>,
}

impl ObservableProperty {
    pub fn new<V: Into<Value>>(value: V) -> Self {
        Self {
            value: RwLock::new(value.into()),
            listeners: Listeners::new(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Property for ObservableProperty {
    fn value(&self) -> Value {
        match self.value.read() {
            Ok(value) => value.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_value(&self, value: Value) -> Result<(), PropertyError> {
        {
            let mut current = self
                .value
                .write()
                .map_err(|_| PropertyError::RwLockPoisoned)?;
            *current = value;
        }

        // listeners may read the value back, so the lock must be released first
        for listener in self.listeners.try_snapshot()? {
            listener.value_change();
        }
        Ok(())
    }

    fn as_notifier(&self) -> Option<&dyn ValueChangeNotifier> {
        Some(self)
    }
}

impl ValueChangeNotifier for ObservableProperty {
    fn add_value_change_listener(
        &self,
        listener: Arc<dyn ValueChangeListener>,
    ) -> Result<(), ListenerError> {
        self.listeners.try_add(listener)
    }

    fn remove_value_change_listener(&self, listener_id: ListenerId) -> Result<bool, ListenerError> {
        self.listeners.try_remove(listener_id)
    }
}

/// A read-only property without change notifications
pub struct ConstantProperty {
    value: Value,
}

impl ConstantProperty {
    pub fn new<V: Into<Value>>(value: V) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl Property for ConstantProperty {
    fn value(&self) -> Value {
        self.value.clone()
    }

    fn set_value(&self, _value: Value) -> Result<(), PropertyError> {
        Err(PropertyError::ReadOnly)
    }
}
