// Android camera and gallery picker
//
// Calls into the host MainActivity over JNI. The activity starts the intent and
// publishes the result through static getters, which are polled here.

use super::{PermissionStatus, PickSource, PlatformPicker};
use crate::error::SelectorError;
use jni::objects::{JClass, JObject, JString, JValue};
use jni::{AttachGuard, JNIEnv, JavaVM};
use ndk_context::android_context;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_MAIN_ACTIVITY_CLASS: &str = "dev/dioxus/main/MainActivity";

/// Value of `getLastError` when the user closed the picker
const CANCELLED_MARKER: &str = "cancelled";

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct AndroidPickerConfig {
    /// Fully qualified class name in slash format (e.g., "com/example/myapp/MainActivity")
    pub main_activity_class: String,
    /// How long to wait for the user before giving up
    pub timeout: Duration,
}

impl Default for AndroidPickerConfig {
    fn default() -> Self {
        Self {
            main_activity_class: DEFAULT_MAIN_ACTIVITY_CLASS.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AndroidPicker {
    config: AndroidPickerConfig,
}

impl AndroidPicker {
    pub fn new(config: AndroidPickerConfig) -> Self {
        Self { config }
    }
}

pub(crate) fn jni_err(context: &str) -> impl Fn(jni::errors::Error) -> SelectorError + '_ {
    move |e| SelectorError::FailToPick(format!("{}: {}", context, e))
}

pub(crate) fn attach_vm() -> Result<JavaVM, SelectorError> {
    let vm_ptr = android_context().vm() as *mut *const jni::sys::JNIInvokeInterface_;
    unsafe { JavaVM::from_raw(vm_ptr) }.map_err(jni_err("JavaVM failed"))
}

fn get_app_class_loader<'a>(env: &mut JNIEnv<'a>) -> Result<JObject<'a>, SelectorError> {
    let at_cls = env
        .find_class("android/app/ActivityThread")
        .map_err(jni_err("ActivityThread not found"))?;
    let at = env
        .call_static_method(
            &at_cls,
            "currentActivityThread",
            "()Landroid/app/ActivityThread;",
            &[],
        )
        .and_then(|v| v.l())
        .map_err(jni_err("currentActivityThread failed"))?;

    let app = env
        .call_method(&at, "getApplication", "()Landroid/app/Application;", &[])
        .and_then(|v| v.l())
        .map_err(jni_err("getApplication failed"))?;

    // Before the application is bound only the system context has a loader
    let context = if app.is_null() {
        env.call_method(&at, "getSystemContext", "()Landroid/app/ContextImpl;", &[])
            .and_then(|v| v.l())
            .map_err(jni_err("getSystemContext failed"))?
    } else {
        app
    };

    env.call_method(&context, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])
        .and_then(|v| v.l())
        .map_err(jni_err("getClassLoader failed"))
}

fn load_class<'a>(
    env: &mut JNIEnv<'a>,
    loader: &JObject<'a>,
    fq_slash: &str,
) -> Result<JClass<'a>, SelectorError> {
    let name: JString = env
        .new_string(fq_slash.replace('/', "."))
        .map_err(jni_err("new_string failed"))?;
    let cls_obj = env
        .call_method(
            loader,
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&JObject::from(name))],
        )
        .and_then(|v| v.l())
        .map_err(jni_err("ClassLoader.loadClass failed"))?;
    Ok(JClass::from(cls_obj))
}

fn get_activity_instance<'a>(
    env: &mut JNIEnv<'a>,
    config: &AndroidPickerConfig,
) -> Result<(JObject<'a>, JClass<'a>), SelectorError> {
    let loader = get_app_class_loader(env)?;
    let cls = load_class(env, &loader, &config.main_activity_class)?;
    let signature = format!("()L{};", config.main_activity_class);

    let instance = match env
        .call_static_method(&cls, "getInstance", &signature, &[])
        .and_then(|v| v.l())
    {
        Ok(instance) => instance,
        Err(_) => {
            if env.exception_check().unwrap_or(false) {
                let _ = env.exception_clear();
            }
            // Kotlin without @JvmStatic: go through the Companion object
            let comp_signature = format!("L{}$Companion;", config.main_activity_class);
            let companion = env
                .get_static_field(&cls, "Companion", &comp_signature)
                .and_then(|v| v.l())
                .map_err(jni_err("Companion field not found"))?;
            if companion.is_null() {
                return Err(SelectorError::FailToPick(
                    "MainActivity.Companion is null".to_string(),
                ));
            }
            env.call_method(&companion, "getInstance", &signature, &[])
                .and_then(|v| v.l())
                .map_err(jni_err("Companion.getInstance() failed"))?
        }
    };

    if instance.is_null() {
        return Err(SelectorError::FailToPick(
            "MainActivity instance is null, activity not initialized?".to_string(),
        ));
    }

    Ok((instance, cls))
}

/// Read a nullable static String getter
fn poll_string(
    env: &mut JNIEnv<'_>,
    cls: &JClass<'_>,
    getter: &str,
) -> Result<Option<String>, SelectorError> {
    let obj = match env
        .call_static_method(cls, getter, "()Ljava/lang/String;", &[])
        .and_then(|v| v.l())
    {
        Ok(obj) if !obj.is_null() => obj,
        _ => return Ok(None),
    };
    let value: String = env
        .get_string((&obj).into())
        .map_err(jni_err("String conversion failed"))?
        .into();
    Ok(Some(value))
}

impl AndroidPicker {
    fn with_activity<T>(
        &self,
        f: impl FnOnce(&mut AttachGuard<'_>, &JObject<'_>, &JClass<'_>) -> Result<T, SelectorError>,
    ) -> Result<T, SelectorError> {
        let vm = attach_vm()?;
        let mut env = vm
            .attach_current_thread()
            .map_err(jni_err("JNI attach failed"))?;
        let (activity, cls) = get_activity_instance(&mut env, &self.config)?;
        f(&mut env, &activity, &cls)
    }

    fn has_camera_permission(&self) -> Result<bool, SelectorError> {
        self.with_activity(|env, activity, _| {
            env.call_method(activity, "hasCameraPermission", "()Z", &[])
                .and_then(|v| v.z())
                .map_err(jni_err("hasCameraPermission failed"))
        })
    }

    fn poll_intervals(&self) -> u32 {
        (self.config.timeout.as_millis() / POLL_INTERVAL.as_millis()).max(1) as u32
    }
}

impl PlatformPicker for AndroidPicker {
    fn permission_status(&self, source: PickSource) -> Result<PermissionStatus, SelectorError> {
        match source {
            // The system photo picker needs no runtime permission
            PickSource::Library => Ok(PermissionStatus::Granted),
            PickSource::Camera => Ok(if self.has_camera_permission()? {
                PermissionStatus::Granted
            } else {
                PermissionStatus::NotDetermined
            }),
        }
    }

    fn request_permission(&self, source: PickSource) -> Result<bool, SelectorError> {
        if source == PickSource::Library {
            return Ok(true);
        }

        self.with_activity(|env, activity, _| {
            env.call_method(activity, "requestCameraPermission", "()V", &[])
                .map_err(jni_err("requestCameraPermission failed"))?;
            Ok(())
        })?;

        for _ in 0..self.poll_intervals() {
            std::thread::sleep(POLL_INTERVAL);
            if self.has_camera_permission()? {
                return Ok(true);
            }
        }

        log::warn!("Camera permission was not granted in time");
        Ok(false)
    }

    fn launch(&self, source: PickSource) -> Result<Option<PathBuf>, SelectorError> {
        let method = match source {
            PickSource::Camera => "launchCamera",
            PickSource::Library => "launchImagePicker",
        };
        let intervals = self.poll_intervals();

        self.with_activity(|env, activity, cls| {
            env.call_static_method(cls, "clearLastError", "()V", &[])
                .map_err(jni_err("clearLastError failed"))?;
            env.call_method(activity, method, "()V", &[])
                .map_err(jni_err(method))?;

            for _ in 0..intervals {
                std::thread::sleep(POLL_INTERVAL);

                if let Some(path) = poll_string(env, cls, "getLastPhotoPath")? {
                    return Ok(Some(PathBuf::from(path)));
                }

                if let Some(err) = poll_string(env, cls, "getLastError")? {
                    if err.eq_ignore_ascii_case(CANCELLED_MARKER) {
                        return Ok(None);
                    }
                    return Err(SelectorError::FailToPick(err));
                }
            }

            Err(SelectorError::FailToPick(format!(
                "{} timeout - no selection made",
                method
            )))
        })
    }
}
