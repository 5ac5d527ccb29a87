mod artist;
mod task_group;
