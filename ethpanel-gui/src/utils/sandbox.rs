use iced::futures::StreamExt;
use iced::Task;
use iced_runtime::{task::into_stream, Action};

use crate::app::{message::Message, App};

/// Drives an [`App`] without a window: every task is run to completion and the
/// messages it produces are fed back to the app.
pub struct Sandbox {
    app: App,
}

impl Sandbox {
    pub fn new(app: App) -> Self {
        Self { app }
    }

    pub fn state(&self) -> &App {
        &self.app
    }

    pub fn state_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub async fn update(mut self, message: Message) -> Self {
        let task = self.app.update(message);
        self.run(task).await
    }

    pub async fn run(mut self, task: Task<Message>) -> Self {
        let mut tasks = vec![task];
        while let Some(task) = tasks.pop() {
            if let Some(mut stream) = into_stream(task) {
                while let Some(action) = stream.next().await {
                    if let Action::Output(msg) = action {
                        tasks.push(self.app.update(msg));
                    }
                }
            }
        }
        self
    }
}
